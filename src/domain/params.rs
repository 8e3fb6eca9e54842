use reqwest::Url;

/// Query parameter names that may carry the client secret, in priority order.
pub const CLIENT_SECRET_PARAMS: [&str; 2] = ["payment_intent_client_secret", "clientSecret"];
pub const PAYMENT_ID_PARAM: &str = "paymentId";

const QUERY_BASE: &str = "http://return.invalid/";

/// Parameters the gateway hands back when it redirects to the confirmation view.
///
/// Read once at view entry. Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationParams {
    client_secret: Option<String>,
    payment_record_id: Option<String>,
}

impl NavigationParams {
    pub fn new(client_secret: Option<String>, payment_record_id: Option<String>) -> Self {
        Self {
            client_secret: client_secret.filter(|s| !s.is_empty()),
            payment_record_id: payment_record_id.filter(|s| !s.is_empty()),
        }
    }

    /// Builds params from decoded key/value pairs. The first non-empty value
    /// of each key is used.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut secrets: [Option<String>; 2] = [None, None];
        let mut payment_record_id = None;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if value.is_empty() {
                continue;
            }
            let target = match CLIENT_SECRET_PARAMS.iter().position(|name| *name == key) {
                Some(slot) => &mut secrets[slot],
                None if key == PAYMENT_ID_PARAM => &mut payment_record_id,
                None => continue,
            };
            if target.is_none() {
                *target = Some(value.to_string());
            }
        }

        let [primary, fallback] = secrets;
        Self::new(primary.or(fallback), payment_record_id)
    }

    /// Accepts a full return URL or a bare query string (with or without `?`).
    pub fn from_return_url(input: &str) -> Self {
        let input = input.trim();
        if let Ok(url) = Url::parse(input)
            && !url.cannot_be_a_base()
        {
            return Self::from_pairs(url.query_pairs());
        }

        let query = input.split_once('?').map_or(input, |(_, query)| query);
        match Url::parse(QUERY_BASE) {
            Ok(mut url) => {
                url.set_query(Some(query));
                Self::from_pairs(url.query_pairs())
            }
            Err(_) => Self::default(),
        }
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn payment_record_id(&self) -> Option<&str> {
        self.payment_record_id.as_deref()
    }
}
