use bakery_core::ServiceError;
use bakery_kv::DeleteOp;
use bakery_store::{delete_many, Record};
use tracing::{info, warn};

use crate::model::{Customer, CustomerForm, OrderTemplate};
use crate::session::Session;

/// Customer CRUD. Removing a customer also removes its standing order.
pub struct CustomerService<'a> {
    session: &'a Session,
}

impl<'a> CustomerService<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Insert or fully replace a customer. An empty id is filled in from the
    /// current time.
    pub async fn save(&self, customer: Customer) -> Result<Customer, ServiceError> {
        self.session.customers.save(customer).await.inspect_err(|e| {
            warn!("save customer failed: {e}");
        })
    }

    /// Coerce raw form input, then save.
    pub async fn save_form(&self, form: CustomerForm) -> Result<Customer, ServiceError> {
        self.save(form.into_customer()).await
    }

    /// All customers, in storage order.
    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        self.session.customers.list().await
    }

    /// Delete the customer and its order template in one unit of work.
    ///
    /// The caller has already confirmed the deletion with the user. On
    /// failure nothing is deleted.
    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let ops = vec![
            DeleteOp::new(Customer::COLLECTION.name, id),
            DeleteOp::new(OrderTemplate::COLLECTION.name, id),
        ];
        match delete_many(self.session.kv(), ops).await {
            Ok(()) => {
                info!("customer '{id}' removed");
                Ok(())
            }
            Err(e) => {
                warn!("remove customer '{id}' failed: {e}");
                Err(e)
            }
        }
    }

    /// Linear scan over `list()`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, ServiceError> {
        Ok(self.list().await?.into_iter().find(|c| c.id == id))
    }
}
