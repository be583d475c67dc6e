pub mod customer;
pub mod report;
pub mod template;

pub use customer::CustomerService;
pub use report::{Report, ReportGenerator, Worksheet, WorksheetLine};
pub use template::TemplateService;
