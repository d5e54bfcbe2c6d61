mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{stub_providers, DownLlm, EchoLlm, HashEmbedder, Harness, NarrowEmbedder};
use pdf_rag::error::Error;
use pdf_rag::generation::{AnswerPipeline, PromptTemplate};
use pdf_rag::providers::EmbeddingProvider;
use pdf_rag::retrieval::{Retriever, VectorIndex};
use pdf_rag::types::Chunk;
use pdf_rag::IndexLifecycle;

#[tokio::test]
async fn test_ask_before_any_upload_fails_with_no_index() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());

    assert!(matches!(lifecycle.current_pipeline(), Err(Error::NoIndex)));
    assert!(matches!(
        lifecycle.answer("What color is the sky?").await,
        Err(Error::NoIndex)
    ));

    let status = lifecycle.status();
    assert!(!status.indexed);
    assert_eq!(status.generation, 0);
}

#[tokio::test]
async fn test_upload_then_ask() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());

    lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();
    assert!(lifecycle.current_pipeline().is_ok());

    let result = lifecycle.answer("What color is the sky?").await.unwrap();
    assert!(result.answer.contains("blue"));
    assert_eq!(result.sources, vec!["doc.pdf".to_string()]);
    assert_eq!(harness.llm.calls(), 1);

    let status = lifecycle.status();
    assert!(status.indexed);
    assert_eq!(status.generation, 1);
    assert_eq!(status.document.as_deref(), Some("doc.pdf"));
    assert!(VectorIndex::exists(&harness.index_dir()).await);
}

#[tokio::test]
async fn test_question_reaches_prompt_as_sent() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
    lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();

    lifecycle.answer("  What color is the sky?\n").await.unwrap();

    let prompt = harness.llm.last_prompt().unwrap();
    assert!(prompt.ends_with("Question:   What color is the sky?\n\nAnswer:"));
}

#[tokio::test]
async fn test_blank_question_never_reaches_generator() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
    lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();

    for question in ["", "   ", "\n\t"] {
        assert!(matches!(
            lifecycle.answer(question).await,
            Err(Error::InvalidInput(_))
        ));
    }

    let pipeline = lifecycle.current_pipeline().unwrap();
    assert!(matches!(pipeline.answer("  ").await, Err(Error::InvalidInput(_))));
    assert_eq!(harness.llm.calls(), 0);
}

#[tokio::test]
async fn test_second_rebuild_replaces_first_document() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());

    lifecycle
        .upload(b"Apples are red. Apples grow on trees.", "apples.pdf")
        .await
        .unwrap();
    let first = lifecycle.current_pipeline().unwrap();

    lifecycle
        .upload(b"Bananas are yellow. Bananas grow in bunches.", "bananas.pdf")
        .await
        .unwrap();
    let second = lifecycle.current_pipeline().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    let result = lifecycle.answer("What color are apples?").await.unwrap();
    assert!(!result.answer.contains("Apples"));
    assert!(result.sources.iter().all(|s| s == "bananas.pdf"));
    assert_eq!(lifecycle.status().generation, 2);
}

#[tokio::test]
async fn test_pipeline_is_cached_within_a_generation() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
    lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();

    let a = lifecycle.current_pipeline().unwrap();
    let b = lifecycle.current_pipeline().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn test_sources_bounded_by_k_and_ordered() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());

    let document = "The sky is blue on clear days.\x0c\
                    Grass is green in spring.\x0c\
                    Snow is white in winter.\x0c\
                    The sky turns orange at dusk.";
    lifecycle.upload(document.as_bytes(), "colors.pdf").await.unwrap();
    assert_eq!(lifecycle.status().chunks, 4);

    let result = lifecycle.answer("What color is the sky?").await.unwrap();
    assert_eq!(result.sources.len(), harness.config.retrieval.top_k);
    assert!(result.sources.iter().all(|s| s == "colors.pdf"));
    assert!(result.answer.contains("sky"));
}

#[tokio::test]
async fn test_chunk_without_source_reports_unknown() {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder);
    let chunks = vec![
        Chunk::new("The sky is blue.", HashMap::new(), 0),
        Chunk::new("Grass is green.", HashMap::new(), 1),
    ];
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await.unwrap();
    let index = VectorIndex::build(chunks, embeddings, embedder.dimensions(), "hash-bow").unwrap();

    let llm = Arc::new(EchoLlm::default());
    let pipeline = AnswerPipeline::new(
        Retriever::new(Arc::new(index), embedder, 2),
        llm.clone(),
        PromptTemplate::default(),
    );

    let result = pipeline.answer("What color is the sky?").await.unwrap();
    assert_eq!(result.sources, vec!["Unknown".to_string(), "Unknown".to_string()]);
    assert!(result.answer.starts_with("The sky is blue."));
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_failed_rebuild_leaves_no_index() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());

    lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();
    assert!(lifecycle.status().indexed);

    let err = lifecycle.upload(b"", "empty.pdf").await.unwrap_err();
    assert!(matches!(err, Error::IndexBuild(_)));

    let status = lifecycle.status();
    assert!(!status.indexed);
    assert_eq!(status.generation, 2);
    assert!(!harness.index_dir().exists());
    assert!(matches!(
        lifecycle.answer("What color is the sky?").await,
        Err(Error::NoIndex)
    ));
}

#[tokio::test]
async fn test_generation_failure_keeps_index() {
    let unused = Arc::new(EchoLlm::default());
    let harness = Harness::with_llm(unused, Arc::new(DownLlm));
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
    lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();

    let err = lifecycle.answer("What color is the sky?").await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
    assert!(lifecycle.status().indexed);
}

#[tokio::test]
async fn test_prime_rebuilds_stored_document_with_its_label() {
    let harness = Harness::new();
    {
        let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
        lifecycle.upload(b"The sky is blue.", "report.pdf").await.unwrap();
    }

    let restarted = IndexLifecycle::new(&harness.config, harness.providers.clone());
    assert!(!restarted.status().indexed);
    restarted.prime().await;

    let status = restarted.status();
    assert!(status.indexed);
    assert_eq!(status.document.as_deref(), Some("report.pdf"));

    let result = restarted.answer("What color is the sky?").await.unwrap();
    assert_eq!(result.sources, vec!["report.pdf".to_string()]);
}

#[tokio::test]
async fn test_prime_loads_persisted_index_without_document() {
    let harness = Harness::new();
    {
        let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
        lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();
    }
    let slot = pdf_rag::ingestion::DocumentSlot::new(&harness.config.storage.document_path);
    tokio::fs::remove_file(slot.path()).await.unwrap();
    tokio::fs::remove_file(slot.meta_path()).await.unwrap();

    let restarted = IndexLifecycle::new(&harness.config, harness.providers.clone());
    restarted.prime().await;

    let status = restarted.status();
    assert!(status.indexed);
    assert_eq!(status.document.as_deref(), Some("doc.pdf"));
}

#[tokio::test]
async fn test_prime_skips_index_from_another_embedder() {
    let harness = Harness::new();
    {
        let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
        lifecycle.upload(b"The sky is blue.", "doc.pdf").await.unwrap();
    }
    let slot = pdf_rag::ingestion::DocumentSlot::new(&harness.config.storage.document_path);
    tokio::fs::remove_file(slot.path()).await.unwrap();

    let mut providers = harness.providers.clone();
    providers.embedder = Arc::new(NarrowEmbedder);
    let restarted = IndexLifecycle::new(&harness.config, providers);
    restarted.prime().await;

    assert!(!restarted.status().indexed);
    let err = restarted.answer("What color is the sky?").await.unwrap_err();
    assert!(matches!(err, Error::NoIndex));
    assert_eq!(harness.llm.calls(), 0);
}

#[tokio::test]
async fn test_prime_with_broken_document_starts_empty() {
    let harness = Harness::new();
    tokio::fs::write(&harness.config.storage.document_path, b"")
        .await
        .unwrap();

    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
    lifecycle.prime().await;

    assert!(!lifecycle.status().indexed);
    assert!(matches!(lifecycle.current_pipeline(), Err(Error::NoIndex)));
}

#[tokio::test]
async fn test_prime_with_nothing_on_disk() {
    let harness = Harness::new();
    let lifecycle = IndexLifecycle::new(&harness.config, harness.providers.clone());
    lifecycle.prime().await;

    let status = lifecycle.status();
    assert!(!status.indexed);
    assert_eq!(status.generation, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rebuilds_and_reads_see_whole_generations() {
    let harness = Harness::new();
    let lifecycle = Arc::new(IndexLifecycle::new(
        &harness.config,
        stub_providers(&harness.config, Arc::new(EchoLlm::default())),
    ));

    let mut writers = Vec::new();
    for i in 0..6 {
        let lifecycle = Arc::clone(&lifecycle);
        writers.push(tokio::spawn(async move {
            let (body, name): (&[u8], &str) = if i % 2 == 0 {
                (b"The sky is blue. Clouds are white.", "sky.pdf")
            } else {
                (b"Grass is green. Trees are tall.", "grass.pdf")
            };
            lifecycle.upload(body, name).await.unwrap();
        }));
    }

    let mut readers = Vec::new();
    for _ in 0..8 {
        let lifecycle = Arc::clone(&lifecycle);
        readers.push(tokio::spawn(async move {
            for _ in 0..25 {
                let status = lifecycle.status();
                assert_eq!(status.indexed, status.document.is_some());
                assert_eq!(status.indexed, status.chunks > 0);

                match lifecycle.answer("What color is it?").await {
                    Ok(result) => {
                        let first = result.sources.first().cloned().unwrap();
                        assert!(result.sources.iter().all(|s| *s == first));
                    }
                    Err(Error::NoIndex) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in writers.into_iter().chain(readers) {
        handle.await.unwrap();
    }

    let status = lifecycle.status();
    assert!(status.indexed);
    assert_eq!(status.generation, 6);
}
