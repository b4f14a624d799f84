use lambda_runtime::{service_fn, Error, LambdaEvent};
use outreach_aws::adapters::bedrock::BedrockTextGenerator;
use outreach_aws::adapters::dynamodb::DynamoCustomerStore;
use outreach_aws::handlers::enrichment::{batch_response, handle_stream_payload, BatchResponse};
use outreach_aws::telemetry::{default_filter, init_tracing, LogFormat};
use outreach_core::config::EnrichmentConfig;
use outreach_core::prompt::GenerationSettings;
use serde_json::Value;

struct RuntimeDependencies {
    store: DynamoCustomerStore,
    generator: BedrockTextGenerator,
    generation: GenerationSettings,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<BatchResponse, Error> {
    // Per-notification failures are logged inside; the trigger always sees success.
    handle_stream_payload(&event.payload, &deps.store, &deps.generator, &deps.generation);
    Ok(batch_response())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing(LogFormat::Json, default_filter(0));

    let config = EnrichmentConfig::from_lookup(|key| std::env::var(key).ok())
        .map_err(|error| Error::from(error.to_string()))?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        store: DynamoCustomerStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            config.table_name,
        ),
        generator: BedrockTextGenerator::new(aws_sdk_bedrockruntime::Client::new(&aws_config)),
        generation: config.generation,
    };
    tracing::info!(
        component = "enrichment_lambda",
        event = "runtime_ready",
        table = deps.store.table_name(),
        model_id = %deps.generation.model_id,
        "enrichment handler initialised"
    );

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
