//! SMS channel backed by an AWS SNS topic.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;

use super::provider::{DeliveryPayload, Notifier};
use crate::error::PipelineError;

/// Publishes payloads to an SNS topic whose subscribers receive SMS.
///
/// The SDK client is created on each delivery so that building the channel
/// never touches the network or the credential chain.
#[derive(Debug, Clone)]
pub struct SmsChannel {
    topic_arn: Option<String>,
    region: Option<String>,
}

impl SmsChannel {
    pub fn new(topic_arn: Option<String>, region: Option<String>) -> Self {
        Self {
            topic_arn: topic_arn.filter(|arn| !arn.trim().is_empty()),
            region,
        }
    }

    pub fn topic_arn(&self) -> Option<&str> {
        self.topic_arn.as_deref()
    }

    async fn client(&self) -> aws_sdk_sns::Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        aws_sdk_sns::Client::new(&loader.load().await)
    }
}

#[async_trait]
impl Notifier for SmsChannel {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<(), PipelineError> {
        let topic_arn = self.topic_arn.as_deref().ok_or_else(|| {
            PipelineError::delivery("SMS topic is not configured (set SMS_TOPIC_ARN)")
        })?;

        let output = self
            .client()
            .await
            .publish()
            .topic_arn(topic_arn)
            .message(payload.text())
            .send()
            .await
            .map_err(|e| {
                PipelineError::delivery(format!(
                    "Failed to publish SMS notification: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!(
            message_id = output.message_id().unwrap_or_default(),
            "SMS notification published"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sms"
    }

    fn display_name(&self) -> &'static str {
        "SMS"
    }
}
