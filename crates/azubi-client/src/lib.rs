//! Session automation engine for the azubiheft.de report book.
//!
//! The site has no API. This crate logs in through its ASP.NET forms,
//! replays the hidden anti-forgery tokens, scrapes the pages it needs and
//! drives the background endpoint the site's own editor uses.
//!
//! # Module Structure
//!
//! - `transport`: HTTP session seam and the `reqwest` implementation
//! - `tokens`: hidden form-token extraction
//! - `pages`: pure page parsers
//! - `text`: report text codec (line breaks to HTML blocks and back)
//! - `auth`: login/logout and the live authentication probe
//! - `week`: date to weekly-container resolution
//! - `subjects`: subject catalog listing and full-rewrite updates
//! - `reports`: report entry write/read/delete
//! - `client`: the `AzubiClient` facade

pub mod auth;
pub mod client;
pub mod endpoints;
mod html;
pub mod pages;
pub mod reports;
pub mod subjects;
pub mod text;
pub mod tokens;
pub mod transport;
pub mod week;

pub use auth::AuthenticationState;
pub use client::AzubiClient;
pub use endpoints::Endpoints;
pub use reports::{EntrySubmission, ReportWorkflow};
pub use subjects::{CatalogChange, SubjectCatalog};
pub use tokens::FormTokens;
pub use transport::{FormFields, HttpSession, PageResponse, ReqwestSession, ReqwestSessionFactory, SessionFactory};
pub use week::WeekResolver;
