use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use outreach_core::prompt::CONTENT_TYPE_JSON;

use crate::adapters::block_on_current;
use crate::adapters::text_generator::{ModelError, TextGenerator};

pub struct BedrockTextGenerator {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockTextGenerator {
    pub fn new(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self { client }
    }
}

impl TextGenerator for BedrockTextGenerator {
    fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, ModelError> {
        let client = self.client.clone();
        let target_model = model_id.to_string();
        let request_body = body.to_vec();

        block_on_current(async move {
            client
                .invoke_model()
                .model_id(target_model)
                .content_type(CONTENT_TYPE_JSON)
                .accept(CONTENT_TYPE_JSON)
                .body(Blob::new(request_body))
                .send()
                .await
        })
        .map(|output| output.body().as_ref().to_vec())
        .map_err(|error| ModelError {
            model_id: model_id.to_string(),
            message: DisplayErrorContext(&error).to_string(),
        })
    }
}
