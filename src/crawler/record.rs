//! Values produced by the two crawl stages

/// Structured result of one product page extraction
///
/// Fields are private so a record cannot change once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    name: String,
    image_url: String,
    price: String,
    rating: String,
    total_ratings: String,
}

impl ProductRecord {
    pub fn new(
        name: String,
        image_url: String,
        price: String,
        rating: String,
        total_ratings: String,
    ) -> Self {
        Self {
            name,
            image_url,
            price,
            rating,
            total_ratings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn rating(&self) -> &str {
        &self.rating
    }

    pub fn total_ratings(&self) -> &str {
        &self.total_ratings
    }

    /// A record is worth keeping if any of name, price or rating was found
    ///
    /// Image URL and rating count alone do not make a record present.
    pub fn is_present(&self) -> bool {
        !self.name.is_empty() || !self.price.is_empty() || !self.rating.is_empty()
    }
}

/// Ordered product URLs found on a seed page
///
/// Filled during discovery only, then handed to the pipeline by value.
/// Duplicate links are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: String) {
        self.links.push(url);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }
}

impl IntoIterator for LinkSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl FromIterator<String> for LinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}
