//! Terminal tables for command output

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use strategy_engine::{CompanyFundamentals, Recommendation, StrategyReport, StrategyResult};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn recommendation_cell(recommendation: Recommendation) -> Cell {
    let color = match recommendation {
        Recommendation::Buy => Color::Green,
        Recommendation::Sell => Color::Red,
        Recommendation::Hold => Color::Yellow,
    };
    Cell::new(recommendation).fg(color)
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn signals(result: &StrategyResult) -> String {
    if result.technical_signals.is_empty() {
        return "insufficient history".to_string();
    }
    result
        .technical_signals
        .iter()
        .map(|(category, label)| format!("{category}={label}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per ticker, failures included
pub fn strategies(reports: &[StrategyReport]) -> Table {
    let mut table = table();
    table.set_header(vec![
        "Ticker",
        "Action",
        "Confidence",
        "Price",
        "Entry",
        "Stop",
        "Target",
        "Sentiment",
        "Volatility",
        "Max DD",
        "Signals",
    ]);

    for report in reports {
        match report {
            StrategyReport::Generated(result) => {
                table.add_row(vec![
                    Cell::new(&result.ticker),
                    recommendation_cell(result.recommendation),
                    Cell::new(format!("{:.1}%", result.confidence)),
                    Cell::new(format!("{:.2}", result.current_price)),
                    Cell::new(format!(
                        "{:.2} / {:.2}",
                        result.entry_points.primary, result.entry_points.secondary
                    )),
                    Cell::new(price(result.stop_loss)),
                    Cell::new(format!("{:.2}", result.target_price)),
                    Cell::new(format!("{:+.3}", result.sentiment_score)),
                    Cell::new(format!("{:.1}%", result.risk_metrics.volatility * 100.0)),
                    Cell::new(format!("{:.1}%", result.risk_metrics.max_drawdown * 100.0)),
                    Cell::new(signals(result)),
                ]);
            }
            StrategyReport::Failed { ticker, error } => {
                table.add_row(vec![
                    Cell::new(ticker),
                    Cell::new("ERROR").fg(Color::Red),
                    Cell::new(error),
                ]);
            }
        }
    }

    table
}

/// Headlines behind each generated strategy
pub fn headlines(reports: &[StrategyReport]) -> Option<Table> {
    let rows: Vec<(&str, &str)> = reports
        .iter()
        .filter_map(StrategyReport::result)
        .flat_map(|result| {
            result
                .news_headlines
                .iter()
                .map(move |headline| (result.ticker.as_str(), headline.as_str()))
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    let mut table = table();
    table.set_header(vec!["Ticker", "Headline"]);
    for (ticker, headline) in rows {
        table.add_row(vec![ticker, headline]);
    }
    Some(table)
}

pub fn fundamentals(fundamentals: &CompanyFundamentals) -> Table {
    let text = |value: Option<&String>| value.map_or("-", String::as_str).to_string();

    let mut table = table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Ticker".to_string(), fundamentals.ticker.clone()]);
    table.add_row(vec!["Name".to_string(), text(fundamentals.name.as_ref())]);
    table.add_row(vec!["Sector".to_string(), text(fundamentals.sector.as_ref())]);
    table.add_row(vec!["Industry".to_string(), text(fundamentals.industry.as_ref())]);
    table.add_row(vec![
        "Market cap".to_string(),
        fundamentals
            .market_cap
            .map_or_else(|| "-".to_string(), |cap| format!("{:.2}B", cap / 1e9)),
    ]);
    table.add_row(vec!["P/E".to_string(), price(fundamentals.pe_ratio)]);
    table.add_row(vec![
        "Dividend yield".to_string(),
        fundamentals
            .dividend_yield
            .map_or_else(|| "-".to_string(), |y| format!("{:.2}%", y * 100.0)),
    ]);
    table.add_row(vec!["Beta".to_string(), price(fundamentals.beta)]);
    table.add_row(vec!["52w high".to_string(), price(fundamentals.week_52_high)]);
    table.add_row(vec!["52w low".to_string(), price(fundamentals.week_52_low)]);
    table
}

pub fn forecast(ticker: &str, last_close: f64, projected: &[f64]) -> Table {
    let mut table = table();
    table.set_header(vec!["Step", ticker, "Change"]);
    table.add_row(vec![
        "last".to_string(),
        format!("{last_close:.2}"),
        String::new(),
    ]);
    for (step, close) in projected.iter().enumerate() {
        let change = if last_close > 0.0 {
            format!("{:+.2}%", (close / last_close - 1.0) * 100.0)
        } else {
            "-".to_string()
        };
        table.add_row(vec![format!("+{}", step + 1), format!("{close:.2}"), change]);
    }
    table
}
