use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.metal-archives.com/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2227.1 Safari/537.36";

#[derive(Clone, Debug)]
pub struct Config {
    /// Root that every site path is joined onto, must end with `/`.
    pub base_url: Url,
    /// The site rejects requests from unrecognised clients.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl Config {
    /// Use a different site root, a missing trailing `/` is added so relative
    /// paths join beneath it rather than replacing its last segment.
    #[culpa::try_fn]
    pub fn with_base_url(mut self, base_url: &str) -> eyre::Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = base_url;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
