use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
use outreach_core::record::{
    AttributeValue, CustomerRecord, Item, COLD_EMAIL_ATTRIBUTE, CUSTOMER_ID_ATTRIBUTE,
};

use crate::adapters::block_on_current;
use crate::adapters::customer_store::{CustomerStore, InsertOutcome, StoreError};

pub struct DynamoCustomerStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoCustomerStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl CustomerStore for DynamoCustomerStore {
    fn customer_exists(&self, customer_id: &str) -> Result<bool, StoreError> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let key = customer_id.to_string();

        block_on_current(async move {
            client
                .get_item()
                .table_name(table_name)
                .key(CUSTOMER_ID_ATTRIBUTE, SdkAttributeValue::S(key))
                .projection_expression("#id")
                .expression_attribute_names("#id", CUSTOMER_ID_ATTRIBUTE)
                .send()
                .await
        })
        .map(|output| output.item().is_some())
        .map_err(|error| StoreError::Lookup {
            customer_id: customer_id.to_string(),
            message: DisplayErrorContext(&error).to_string(),
        })
    }

    fn insert_customer(&self, record: &CustomerRecord) -> Result<InsertOutcome, StoreError> {
        let item = sdk_item(record.to_item()).map_err(|message| StoreError::Insert {
            customer_id: record.customer_id.clone(),
            message,
        })?;
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        let result = block_on_current(async move {
            client
                .put_item()
                .table_name(table_name)
                .set_item(Some(item))
                .condition_expression("attribute_not_exists(#id)")
                .expression_attribute_names("#id", CUSTOMER_ID_ATTRIBUTE)
                .send()
                .await
        });

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(error) => Err(StoreError::Insert {
                customer_id: record.customer_id.clone(),
                message: DisplayErrorContext(&error).to_string(),
            }),
        }
    }

    fn set_cold_email(&self, customer_id: &str, content: &str) -> Result<(), StoreError> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let key = customer_id.to_string();
        let value = content.to_string();

        block_on_current(async move {
            client
                .update_item()
                .table_name(table_name)
                .key(CUSTOMER_ID_ATTRIBUTE, SdkAttributeValue::S(key))
                .update_expression("SET #content = :val")
                .condition_expression("attribute_exists(#id)")
                .expression_attribute_names("#content", COLD_EMAIL_ATTRIBUTE)
                .expression_attribute_names("#id", CUSTOMER_ID_ATTRIBUTE)
                .expression_attribute_values(":val", SdkAttributeValue::S(value))
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| StoreError::Update {
            customer_id: customer_id.to_string(),
            message: DisplayErrorContext(&error).to_string(),
        })
    }
}

pub fn sdk_item(item: Item) -> Result<HashMap<String, SdkAttributeValue>, String> {
    item.into_iter()
        .map(|(name, value)| to_sdk_attribute(value).map(|converted| (name, converted)))
        .collect()
}

pub fn to_sdk_attribute(value: AttributeValue) -> Result<SdkAttributeValue, String> {
    Ok(match value {
        AttributeValue::String(text) => SdkAttributeValue::S(text),
        AttributeValue::Number(number) => SdkAttributeValue::N(number),
        AttributeValue::Boolean(flag) => SdkAttributeValue::Bool(flag),
        AttributeValue::Null(flag) => SdkAttributeValue::Null(flag),
        AttributeValue::StringSet(values) => SdkAttributeValue::Ss(values),
        AttributeValue::NumberSet(values) => SdkAttributeValue::Ns(values),
        AttributeValue::List(values) => SdkAttributeValue::L(
            values
                .into_iter()
                .map(to_sdk_attribute)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::Map(item) => SdkAttributeValue::M(sdk_item(item)?),
        AttributeValue::Binary(_) | AttributeValue::BinarySet(_) => {
            return Err("binary attributes cannot be written to the customer table".to_string());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_record_converts_to_sdk_item() {
        let record = CustomerRecord::new("x1", "Jane", "Doe", "skiing,hiking", 34);
        let item = sdk_item(record.to_item()).expect("record should convert");

        assert_eq!(item.len(), 5);
        assert_eq!(
            item.get("customer_id"),
            Some(&SdkAttributeValue::S("x1".to_string()))
        );
        assert_eq!(item.get("age"), Some(&SdkAttributeValue::N("34".to_string())));
        assert!(!item.contains_key("cold_email_content"));
    }

    #[test]
    fn nested_values_convert_recursively() {
        let mut inner = Item::new();
        inner.insert("flag".to_string(), AttributeValue::Boolean(true));
        let value = AttributeValue::List(vec![
            AttributeValue::Map(inner),
            AttributeValue::NumberSet(vec!["1".to_string()]),
        ]);

        let SdkAttributeValue::L(values) = to_sdk_attribute(value).expect("should convert") else {
            panic!("expected list");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values[1], SdkAttributeValue::Ns(vec!["1".to_string()]));
    }

    #[test]
    fn binary_values_are_rejected() {
        let error = to_sdk_attribute(AttributeValue::Binary("AAE=".to_string()))
            .expect_err("binary should be rejected");
        assert!(error.contains("binary"));
    }
}
