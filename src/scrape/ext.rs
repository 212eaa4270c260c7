use scraper::{ElementRef, Html, Selector};

pub(crate) trait JsonExt {
    fn parse_json<T: serde::de::DeserializeOwned>(&self) -> eyre::Result<T>;
}

impl JsonExt for str {
    #[culpa::try_fn]
    fn parse_json<T: serde::de::DeserializeOwned>(&self) -> eyre::Result<T> {
        serde_json::from_str(self)?
    }
}

#[culpa::try_fn]
fn selector(selector: &str) -> eyre::Result<Selector> {
    Selector::parse(selector).map_err(|e| eyre::eyre!("{e:?}"))?
}

pub(crate) trait ScraperExt {
    fn try_select(&self, selector: &str) -> eyre::Result<Vec<ElementRef<'_>>>;

    fn try_select_one(&self, selector: &str) -> eyre::Result<ElementRef<'_>>;

    /// Like `try_select_one` but an absent element is not an error.
    fn try_select_opt(&self, selector: &str) -> eyre::Result<Option<ElementRef<'_>>> {
        Ok(self.try_select(selector)?.into_iter().next())
    }
}

impl ScraperExt for Html {
    #[culpa::try_fn]
    #[tracing::instrument(level = "trace", skip(self))]
    fn try_select(&self, selector: &str) -> eyre::Result<Vec<ElementRef<'_>>> {
        let s = self::selector(selector)?;
        self.select(&s).collect()
    }

    #[culpa::try_fn]
    #[tracing::instrument(level = "trace", skip(self))]
    fn try_select_one(&self, selector: &str) -> eyre::Result<ElementRef<'_>> {
        let s = self::selector(selector)?;
        self.select(&s)
            .next()
            .ok_or_else(|| eyre::eyre!("missing element for {selector}"))?
    }
}

impl ScraperExt for ElementRef<'_> {
    #[culpa::try_fn]
    #[tracing::instrument(level = "trace", skip(self))]
    fn try_select(&self, selector: &str) -> eyre::Result<Vec<ElementRef<'_>>> {
        let s = self::selector(selector)?;
        self.select(&s).collect()
    }

    #[culpa::try_fn]
    #[tracing::instrument(level = "trace", skip(self))]
    fn try_select_one(&self, selector: &str) -> eyre::Result<ElementRef<'_>> {
        let s = self::selector(selector)?;
        self.select(&s)
            .next()
            .ok_or_else(|| eyre::eyre!("missing element for {selector}"))?
    }
}

pub(crate) trait TextExt {
    /// All descendant text with runs of whitespace collapsed to one space.
    fn clean_text(&self) -> String;
}

impl TextExt for ElementRef<'_> {
    fn clean_text(&self) -> String {
        self.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The `<dt>`/`<dd>` pairs entity pages list their facts in.
#[derive(Debug)]
pub(crate) struct Definitions<'a> {
    labels: Vec<String>,
    values: Vec<ElementRef<'a>>,
}

impl<'a> Definitions<'a> {
    #[culpa::try_fn]
    pub(crate) fn new(document: &'a Html) -> eyre::Result<Self> {
        let labels = document
            .try_select("dt")?
            .into_iter()
            .map(|dt| dt.clean_text())
            .collect();
        let values = document.try_select("dd")?;
        Self { labels, values }
    }

    pub(crate) fn element(&self, label: &str) -> Option<ElementRef<'a>> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.values.get(index).copied()
    }

    /// Text of the first label present, empty if none are.
    pub(crate) fn text(&self, labels: &[&str]) -> String {
        labels
            .iter()
            .find_map(|label| self.element(label))
            .map(|dd| dd.clean_text())
            .unwrap_or_default()
    }
}
