//! Bill display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::models::{Bill, Service};
use crate::services::BillSummary;

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Coworker")]
    coworker: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Payment")]
    payment: String,
}

/// Bill list as a table, most recent first
pub fn format_bill_list(summaries: &[BillSummary], date_format: &str) -> String {
    if summaries.is_empty() {
        return "No bills found.".to_string();
    }

    let rows = summaries.iter().map(|s| BillRow {
        number: s.bill.number.clone(),
        coworker: s.coworker.clone(),
        date: s.bill.billing_date.format(date_format).to_string(),
        amount: s.bill.amount.to_string(),
        payment: s.payment.clone(),
    });

    Table::new(rows)
        .with(Style::psql())
        .modify(Columns::single(3), Alignment::right())
        .to_string()
}

/// Full bill with addresses and lines
pub fn format_bill_details(
    bill: &Bill,
    coworker: &str,
    services: &[Service],
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bill: {}\n", bill.number));
    output.push_str(&format!("  ID:        {}\n", bill.id));
    output.push_str(&format!("  Coworker:  {}\n", coworker));
    output.push_str(&format!(
        "  Date:      {}\n",
        bill.billing_date.format(&settings.date_format)
    ));
    output.push_str(&format!(
        "  Amount:    {}\n",
        bill.amount.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "  Payment:   {}\n",
        crate::services::payment_status(bill, &settings.payment_link)
    ));

    if !bill.issuer_address.is_empty() {
        output.push_str(&format!("  From:      {}\n", bill.issuer_address));
    }
    output.push_str(&format!("  Bill to:   {}\n", bill.billing_address));

    if bill.lines.is_empty() {
        output.push_str("\n  (no lines)\n");
        return output;
    }

    output.push_str(&format!(
        "\n  {:<12} {:<30} {:>4} {:>12}\n",
        "Line", "Service", "Qty", "Total"
    ));
    for line in &bill.lines {
        let service = services
            .iter()
            .find(|s| s.id == line.service_id)
            .map(|s| s.name.as_str())
            .unwrap_or("(unknown service)");
        output.push_str(&format!(
            "  {:<12} {:<30} {:>4} {:>12}\n",
            line.id.to_string(),
            super::report::truncate(service, 30),
            line.quantity,
            line.total
        ));
        if !line.note.is_empty() {
            output.push_str(&format!("               {}\n", line.note));
        }
    }

    output
}
