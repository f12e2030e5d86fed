//! Non-visual logic of the Kong admin user screen: the user table controller
//! and the HTTP client every gateway call goes through.

mod config;
pub mod http;
pub mod user_table;
pub mod users_api;

pub use config::{ConfigError, DEFAULT_TIMEOUT, HttpConfig};
pub use http::{
    ErrorEnvelope, FailureCause, HttpClient, HttpError, HttpResult, Interceptor, JsonInterceptor,
    Method, Request, RequestError, Response,
};
pub use user_table::{
    Column, FieldValue, Row, SelectAllState, SortDirection, TableAction, TableState, TableView,
    USER_COLUMNS, UserRow,
};
