//! Network clients for prices, headlines and fundamentals

pub mod alpha_vantage;
pub mod news_api;
pub mod yahoo;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview};
pub use news_api::{NewsApiClient, NewsArticle, NewsResponse};
pub use yahoo::YahooFinanceClient;
