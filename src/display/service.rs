//! Service catalogue display

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::Service;

use super::report::{truncate, yes_no};

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Available")]
    available: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn format_service_list(services: &[Service], currency_symbol: &str) -> String {
    if services.is_empty() {
        return "No services found.".to_string();
    }

    let rows = services.iter().map(|s| ServiceRow {
        id: s.id.to_string(),
        name: s.name.clone(),
        price: s.price.format_with_symbol(currency_symbol),
        available: yes_no(s.is_available),
        description: truncate(&s.description, 40),
    });

    Table::new(rows)
        .with(Style::psql())
        .modify(Columns::single(2), Alignment::right())
        .to_string()
}
