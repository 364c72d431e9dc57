use gibes::query::QueryParams;
use web_sys::UrlSearchParams;

pub struct LocationQuery {
    params: Option<UrlSearchParams>,
}

impl LocationQuery {
    pub fn current(window: &web_sys::Window) -> Self {
        let params = window
            .location()
            .search()
            .ok()
            .and_then(|search| UrlSearchParams::new_with_str(&search).ok());
        Self { params }
    }
}

impl QueryParams for LocationQuery {
    fn get(&self, name: &str) -> Option<String> {
        self.params.as_ref()?.get(name)
    }
}
