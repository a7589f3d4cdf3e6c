// ドメイン層
// 予約のライフサイクルとケイパビリティ付きの読み取りモデルを定義する

pub mod error;
pub mod model;
pub mod port;
