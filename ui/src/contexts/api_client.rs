use std::rc::Rc;

use payloads::APIClient;

/// The API client shared by every hook below the [`App`](crate::App).
#[derive(Debug, Clone)]
pub struct ApiClientContext(pub Rc<APIClient>);

impl PartialEq for ApiClientContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl ApiClientContext {
    pub fn new(client: APIClient) -> Self {
        Self(Rc::new(client))
    }

    pub fn client(&self) -> &APIClient {
        &self.0
    }
}
