/// ドメイン層のエラー型
/// 呼び出し側に区別して伝える必要のある業務上の失敗を表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// 対象が存在しない、または他のユーザーが所有している
    #[error("Not found: {0}")]
    NotFound(String),
    /// 要求されたユニット数が残りの空き枠を超えている
    #[error("Not available")]
    NotAvailable,
    /// 無効な値
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
