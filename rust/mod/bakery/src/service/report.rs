use std::collections::HashMap;

use bakery_core::{EmptyReportPolicy, ServiceError};
use tracing::debug;

use crate::model::{Customer, OrderTemplate};
use crate::session::Session;

/// One delivery: a customer and the units to bring them.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetLine {
    pub customer: Customer,
    pub quantity: u32,
}

/// The delivery list for one round.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    lines: Vec<WorksheetLine>,
    total: u64,
}

impl Worksheet {
    /// Join customers with their templates. Lines keep the customer order;
    /// a customer without a template gets quantity 0.
    pub fn build(customers: Vec<Customer>, templates: &[OrderTemplate]) -> Self {
        let by_customer: HashMap<&str, u32> = templates
            .iter()
            .map(|t| (t.customer_id.as_str(), t.quantity))
            .collect();

        let mut total = 0u64;
        let lines = customers
            .into_iter()
            .map(|customer| {
                let quantity = by_customer.get(customer.id.as_str()).copied().unwrap_or(0);
                total += u64::from(quantity);
                WorksheetLine { customer, quantity }
            })
            .collect();

        Self { lines, total }
    }

    pub fn lines(&self) -> &[WorksheetLine] {
        &self.lines
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Change one line's quantity on this worksheet only. Nothing is saved:
    /// generating again brings back the template quantities.
    ///
    /// Returns false, changing nothing, when the customer is not listed.
    pub fn override_quantity(&mut self, customer_id: &str, quantity: u32) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.customer.id == customer_id) else {
            return false;
        };
        line.quantity = quantity;
        self.total = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
        true
    }
}

/// Outcome of a report request.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// There are no customers, so no worksheet was produced.
    NoCustomers,
    Ready(Worksheet),
}

impl Report {
    pub fn worksheet(&self) -> Option<&Worksheet> {
        match self {
            Report::Ready(w) => Some(w),
            Report::NoCustomers => None,
        }
    }
}

/// Builds the delivery worksheet from customers and their standing orders.
pub struct ReportGenerator<'a> {
    session: &'a Session,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Read customers, then templates, and join them.
    ///
    /// The two reads are separate, so a template written in between may or
    /// may not show up.
    pub async fn generate(&self) -> Result<Report, ServiceError> {
        let customers = self.session.customers.list().await?;
        if customers.is_empty() && self.session.report.empty == EmptyReportPolicy::Refuse {
            debug!("report requested with no customers");
            return Ok(Report::NoCustomers);
        }

        let templates = self.session.templates.list().await?;
        let worksheet = Worksheet::build(customers, &templates);
        debug!(
            "report generated: {} lines, {} units",
            worksheet.lines().len(),
            worksheet.total()
        );
        Ok(Report::Ready(worksheet))
    }
}
