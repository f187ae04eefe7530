use crate::adapters::xml::parse_users;
use crate::core::converter::Converter;
use crate::core::{Delivery, Pipeline};
use crate::domain::model::{BatchResult, DeliveryReceipt, OutputUser, RawUser};
use crate::utils::error::Result;

/// XML in, validated JSON out through a [`Delivery`].
pub struct UsersPipeline<D: Delivery> {
    converter: Converter,
    delivery: D,
}

impl<D: Delivery> UsersPipeline<D> {
    pub fn new(converter: Converter, delivery: D) -> Self {
        Self {
            converter,
            delivery,
        }
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }
}

#[async_trait::async_trait]
impl<D: Delivery> Pipeline for UsersPipeline<D> {
    async fn extract(&self, payload: Vec<u8>) -> Result<Vec<RawUser>> {
        parse_users(&payload)
    }

    async fn transform(&self, users: Vec<RawUser>) -> Result<BatchResult> {
        self.converter.convert_async(users).await
    }

    async fn load(&self, users: &[OutputUser]) -> Result<DeliveryReceipt> {
        self.delivery.deliver(users).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::etl::{EtlEngine, RunOutcome};
    use crate::core::aggregate::FailureReason;
    use crate::utils::error::EtlError;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockDelivery {
        batches: Arc<Mutex<Vec<Vec<OutputUser>>>>,
        fail_with: Option<u16>,
    }

    impl Delivery for MockDelivery {
        async fn deliver(&self, users: &[OutputUser]) -> Result<DeliveryReceipt> {
            if let Some(status) = self.fail_with {
                return Err(EtlError::DeliveryStatus {
                    status,
                    body: "rejected".to_string(),
                });
            }
            self.batches.lock().await.push(users.to_vec());
            Ok(DeliveryReceipt {
                destination: "mock".to_string(),
                status: Some(200),
                body: String::new(),
            })
        }
    }

    fn engine(delivery: MockDelivery) -> EtlEngine<UsersPipeline<MockDelivery>> {
        EtlEngine::new(UsersPipeline::new(Converter::default(), delivery))
    }

    const MIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<users>
    <user id="1">
        <name>Иван Иванов</name>
        <email>ivan@example.com</email>
        <age>30</age>
    </user>
    <user id=" ">
        <name>Без ID</name>
        <email>noid@example.com</email>
        <age>40</age>
    </user>
    <user id="3">
        <name>Мария Петрова</name>
        <email>maria@example.com</email>
        <age>22</age>
    </user>
</users>"#;

    #[tokio::test]
    async fn test_partial_batch_is_delivered_with_warning() {
        let delivery = MockDelivery::default();
        let report = engine(delivery.clone()).run(MIXED.as_bytes().to_vec()).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Partial);
        assert_eq!(report.delivered, 2);
        let dropped = report.dropped.unwrap();
        assert_eq!(dropped.indices(), vec![1]);
        assert_eq!(dropped.failures()[0].reason, FailureReason::EmptyId);

        let batches = delivery.batches.lock().await;
        assert_eq!(batches.len(), 1);
        let ids: Vec<&str> = batches[0].iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_empty_age_drops_only_that_record() {
        let xml = r#"<users>
    <user id="1"><name>A</name><email>a@example.com</email><age></age></user>
    <user id="2"><name>B</name><email>b@example.com</email><age>36</age></user>
</users>"#;
        let delivery = MockDelivery::default();

        let report = engine(delivery.clone()).run(xml.as_bytes().to_vec()).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Partial);
        assert_eq!(report.delivered, 1);
        let dropped = report.dropped.unwrap();
        assert_eq!(dropped.indices(), vec![0]);
        assert_eq!(dropped.failures()[0].reason, FailureReason::InvalidAge);
        assert_eq!(delivery.batches.lock().await[0][0].id, "2");
    }

    #[tokio::test]
    async fn test_all_invalid_batch_is_not_delivered() {
        let xml = r#"<users><user id="1"><name></name><email>a@b.c</email><age>30</age></user></users>"#;
        let delivery = MockDelivery::default();

        let err = engine(delivery.clone()).run(xml.as_bytes().to_vec()).await.unwrap_err();

        assert!(matches!(err, EtlError::AllRecordsInvalid(ref e) if e.len() == 1));
        assert!(delivery.batches.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected() {
        let err = engine(MockDelivery::default()).run(Vec::new()).await.unwrap_err();
        assert!(matches!(err, EtlError::EmptyData));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_surfaced() {
        let delivery = MockDelivery {
            fail_with: Some(500),
            ..Default::default()
        };

        let err = engine(delivery).run(MIXED.as_bytes().to_vec()).await.unwrap_err();

        assert!(matches!(err, EtlError::DeliveryStatus { status: 500, .. }));
    }
}
