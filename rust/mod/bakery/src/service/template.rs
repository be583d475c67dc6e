use bakery_core::ServiceError;
use tracing::warn;

use crate::model::{parse_quantity, OrderTemplate};
use crate::session::Session;

/// Standing-order CRUD, one template per customer.
pub struct TemplateService<'a> {
    session: &'a Session,
}

impl<'a> TemplateService<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The customer's template, or a zero-quantity one when none is saved.
    /// Having no template is not an error.
    pub async fn get(&self, customer_id: &str) -> Result<OrderTemplate, ServiceError> {
        let found = self
            .list()
            .await?
            .into_iter()
            .find(|t| t.customer_id == customer_id);
        Ok(found.unwrap_or_else(|| OrderTemplate::empty(customer_id)))
    }

    /// Validate the raw quantity and upsert the template. Invalid input is
    /// rejected before anything is written.
    pub async fn save(
        &self,
        customer_id: &str,
        raw_quantity: &str,
    ) -> Result<OrderTemplate, ServiceError> {
        let quantity = parse_quantity(raw_quantity)?;
        self.put(OrderTemplate {
            customer_id: customer_id.to_string(),
            quantity,
        })
        .await
    }

    /// Upsert an already validated template.
    pub async fn put(&self, template: OrderTemplate) -> Result<OrderTemplate, ServiceError> {
        self.session.templates.save(template).await.inspect_err(|e| {
            warn!("save template failed: {e}");
        })
    }

    pub async fn list(&self) -> Result<Vec<OrderTemplate>, ServiceError> {
        self.session.templates.list().await
    }
}
