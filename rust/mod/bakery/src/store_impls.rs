//! Record implementations for bakery models.

use bakery_core::new_id;
use bakery_kv::Collection;
use bakery_store::Record;

use crate::model::*;

impl Record for Customer {
    const COLLECTION: Collection = Collection::new("customers", "id");
    fn key_value(&self) -> String { self.id.clone() }
    fn before_save(&mut self) {
        if self.id.is_empty() {
            self.id = new_id();
        }
        // JSON has no NaN/inf; they would be written as null and fail to load.
        self.balance = finite_or_zero(self.balance);
    }
}

impl Record for OrderTemplate {
    const COLLECTION: Collection = Collection::new("templates", "customerId");
    fn key_value(&self) -> String { self.customer_id.clone() }
}
