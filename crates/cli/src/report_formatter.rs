#![allow(clippy::format_push_string)]

use rust_decimal::Decimal;

use odss_core::Recommendation;
use odss_data::Portfolio;
use odss_options_manager::RecommendationReport;

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════════════\n";
const THIN_RULE: &str =
    "───────────────────────────────────────────────────────────────────────────────────────\n";

pub struct ReportFormatter;

impl ReportFormatter {
    #[must_use]
    pub fn format_portfolio(portfolio: &Portfolio) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str("                              PORTFOLIO\n");
        output.push_str(RULE);
        output.push_str(&format!(
            "{:<10} {:>10} {:>12} {:>12}\n",
            "Ticker", "Shares", "Buy Max", "Sell Min"
        ));
        output.push_str(THIN_RULE);
        for holding in &portfolio.holdings {
            output.push_str(&format!(
                "{:<10} {:>10} {:>12} {:>12}\n",
                holding.ticker,
                holding.shares,
                money(holding.buy_max),
                money(holding.sell_min),
            ));
        }
        output.push_str(THIN_RULE);
        output.push_str(&format!("Cash:      ${}\n", portfolio.cash));

        output
    }

    #[must_use]
    pub fn format(report: &RecommendationReport, description: &str) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str("                           RECOMMENDATIONS\n");
        output.push_str(RULE);
        output.push_str(&format!("Strategy:              {} ({})\n", report.strategy, description));
        output.push_str(&format!(
            "Generated:             {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push('\n');

        if report.is_empty() {
            output.push_str("No qualifying contracts found.\n");
            return output;
        }

        output.push_str("Calls\n");
        output.push_str(THIN_RULE);
        Self::push_rows(&mut output, report.calls());
        output.push('\n');

        output.push_str("Puts\n");
        output.push_str(THIN_RULE);
        Self::push_rows(&mut output, report.puts());
        output.push('\n');

        output.push_str("Summary\n");
        output.push_str(THIN_RULE);
        output.push_str(&format!(
            "Income / Day:          ${}\n",
            money(report.total_income_per_day())
        ));
        output.push_str(&format!("Cash:                  ${}\n", report.cash));
        output.push_str(&format!(
            "Committed to Puts:     ${}\n",
            money(report.committed_cash())
        ));
        output.push_str(&format!(
            "Uncommitted:           ${}\n",
            money(report.uncommitted_cash())
        ));
        output.push_str(RULE);

        output
    }

    fn push_rows<'a>(output: &mut String, rows: impl Iterator<Item = &'a Recommendation>) {
        output.push_str(&format!(
            "{:<24} {:<8} {:>10} {:>8} {:>8} {:>12} {:>10}\n",
            "Contract", "Ticker", "Strike", "Bid", "Ask", "Income/Day", "Contracts"
        ));
        let mut any = false;
        for row in rows {
            any = true;
            output.push_str(&format!(
                "{:<24} {:<8} {:>10} {:>8} {:>8} {:>12} {:>10}\n",
                row.name,
                row.ticker,
                money(row.strike),
                money(row.bid),
                money(row.ask),
                format!("{:.4}", row.income_per_day),
                row.contract_count,
            ));
        }
        if !any {
            output.push_str("  (none)\n");
        }
    }
}

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}
