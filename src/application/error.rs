use crate::domain::error::DomainError;
use crate::domain::port::RepositoryError;

/// アプリケーション層のエラー型
/// ドメインエラーと、センチネル以外のリポジトリエラーをラップする
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// ドメインエラー（存在しない、空きがないなど）
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
    /// リポジトリエラー（永続化の失敗）
    #[error("{operation}: {source}")]
    RepositoryError {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ApplicationError {
    /// リポジトリエラーを操作名付きで変換する
    /// センチネルはドメインエラーに読み替え、それ以外はそのまま包む
    pub fn from_repository(
        operation: &'static str,
        not_found: impl FnOnce() -> String,
        err: RepositoryError,
    ) -> Self {
        match err {
            RepositoryError::NotFound => {
                ApplicationError::DomainError(DomainError::NotFound(not_found()))
            }
            RepositoryError::NotAvailable => {
                ApplicationError::DomainError(DomainError::NotAvailable)
            }
            source => ApplicationError::RepositoryError { operation, source },
        }
    }

    /// 対象が見つからないエラーかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::DomainError(DomainError::NotFound(_)))
    }
}
