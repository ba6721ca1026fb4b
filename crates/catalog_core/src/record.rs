use serde::{Deserialize, Serialize};

/// One product tile as printed on the catalog page.
///
/// Prices and quantities are kept verbatim; there is no positional
/// correspondence between `prices[i]` and `quantities[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: Option<String>,
    #[serde(default)]
    pub prices: Vec<String>,
    #[serde(default)]
    pub quantities: Vec<String>,
}

impl ProductRecord {
    pub fn builder() -> ProductRecordBuilder {
        ProductRecordBuilder::default()
    }

    /// True when the tile carried none of the three fields.
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.prices.is_empty() && self.quantities.is_empty()
    }
}

/// Merges independently looked-up fields into one record.
///
/// Every setter accepts the "absent" shape of its field, so one missing
/// lookup never prevents the others from landing in the record.
#[derive(Debug, Default)]
pub struct ProductRecordBuilder {
    name: Option<String>,
    prices: Vec<String>,
    quantities: Vec<String>,
}

impl ProductRecordBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn prices(mut self, prices: Vec<String>) -> Self {
        self.prices = prices;
        self
    }

    pub fn quantities(mut self, quantities: Vec<String>) -> Self {
        self.quantities = quantities;
        self
    }

    pub fn build(self) -> ProductRecord {
        ProductRecord {
            name: self.name,
            prices: self.prices,
            quantities: self.quantities,
        }
    }
}
