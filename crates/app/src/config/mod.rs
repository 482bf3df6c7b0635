use serde::{Deserialize, Serialize};

use ledger_db::PageRequest;

/// Raw paging input as it arrives from a caller; any value is accepted and
/// normalized before it reaches storage.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PageParams {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn to_page_request(&self) -> PageRequest {
        PageRequest::normalized(self.page.unwrap_or(1), self.page_size.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_db::DEFAULT_PAGE_SIZE;

    #[test]
    fn missing_params_use_first_page_and_default_size() {
        let request = PageParams::default().to_page_request();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn limit_alias_is_accepted() {
        let params: PageParams =
            serde_json::from_str(r#"{"page":2,"limit":5}"#).expect("deserialize");
        let request = params.to_page_request();
        assert_eq!((request.page, request.page_size), (2, 5));
    }
}
