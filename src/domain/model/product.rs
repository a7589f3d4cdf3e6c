use crate::domain::model::capability::{CapabilityView, Price, Priced};
use crate::domain::model::ProductId;
use serde::Serialize;
use utoipa::ToSchema;

/// 追加情報なしの商品
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBase {
    id: ProductId,
    name: String,
    capacity: i32,
}

impl ProductBase {
    /// 新しい商品を作成
    ///
    /// # Arguments
    /// * `id` - 商品ID
    /// * `name` - 商品名
    /// * `capacity` - 定員（参考値で、日ごとの上限ではない）
    pub fn new(id: ProductId, name: impl Into<String>, capacity: i32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }
}

/// 商品
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Product {
    Base(ProductBase),
    WithPrice(Priced<ProductBase>),
}

impl CapabilityView for Product {
    type Base = ProductBase;

    fn base(&self) -> &ProductBase {
        match self {
            Product::Base(base) => base,
            Product::WithPrice(priced) => priced.base(),
        }
    }

    fn price(&self) -> Option<&Price> {
        match self {
            Product::Base(_) => None,
            Product::WithPrice(priced) => Some(priced.price()),
        }
    }
}
