pub mod model;
pub mod service;
pub mod session;
mod store_impls;
#[cfg(test)]
mod test_support;

pub use model::{Customer, CustomerForm, OrderTemplate};
pub use service::{
    CustomerService, Report, ReportGenerator, TemplateService, Worksheet, WorksheetLine,
};
pub use session::{Session, SCHEMA_VERSION};
