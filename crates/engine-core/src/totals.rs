use model::core::asset::Asset;
use tracing::warn;

/// Sum of a column of asset strings such as `"12.5000 SEEDS"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTotal {
    pub total: Option<Asset>,
    pub counted: usize,
    pub skipped: usize,
}

impl AssetTotal {
    /// Adds up every value that parses and matches the first value's symbol
    /// and precision. Anything else is counted in `skipped`.
    pub fn collect<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        values
            .into_iter()
            .fold(AssetTotal::default(), |acc, raw| acc.add(raw))
    }

    fn add(mut self, raw: &str) -> Self {
        let parsed = raw.parse::<Asset>();
        let summed = match (&self.total, parsed) {
            (_, Err(err)) => Err(err),
            (None, Ok(asset)) => Ok(asset),
            (Some(total), Ok(asset)) => total.checked_add(&asset),
        };

        match summed {
            Ok(total) => {
                self.total = Some(total);
                self.counted += 1;
            }
            Err(err) => {
                warn!("Skipping {:?} in totals: {}", raw, err);
                self.skipped += 1;
            }
        }
        self
    }
}
