/// Knobs for [`crate::Map::load_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Read `.json` external tilesets next to the map and attach their data.
    /// When off, external references are kept as bare `first_gid` + `source`.
    pub load_external_tilesets: bool,
    /// Run [`crate::Map::validate`] on the result.
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            load_external_tilesets: false,
            validate: true,
        }
    }
}

impl LoadOptions {
    /// Sets [`LoadOptions::load_external_tilesets`].
    pub fn load_external_tilesets(mut self, on: bool) -> Self {
        self.load_external_tilesets = on;
        self
    }

    /// Sets [`LoadOptions::validate`].
    pub fn validate(mut self, on: bool) -> Self {
        self.validate = on;
        self
    }
}
