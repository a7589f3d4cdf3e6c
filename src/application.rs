// アプリケーション層
// リポジトリのセンチネルをドメインエラーに読み替える薄いオーケストレーション

mod error;
pub mod service;

pub use error::ApplicationError;
