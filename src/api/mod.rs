//! REST backend access.

pub mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::controller::{Outcome, Request, Resource};
use crate::error::{AppError, Result};

/// Collection-level REST operations.
///
/// `list` returns the response's `data`; mutations return its `message`.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list(&self, path: &str) -> Result<Value>;

    async fn create(&self, path: &str, body: Value) -> Result<Option<String>>;

    async fn update(&self, path: &str, id: &str, body: Value) -> Result<Option<String>>;

    async fn delete(&self, path: &str, id: &str) -> Result<Option<String>>;
}

/// Run a controller request against the API.
pub async fn execute<R: Resource>(api: &dyn ResourceApi, request: Request<R>) -> Outcome<R> {
    match request {
        Request::List => {
            let result = match api.list(R::PATH).await {
                Ok(data) => R::decode_list(data),
                Err(e) => Err(e),
            };
            Outcome::Listed(result)
        }
        Request::Create(payload) => {
            let result = match to_body(&payload) {
                Ok(body) => api.create(R::PATH, body).await,
                Err(e) => Err(e),
            };
            Outcome::Saved {
                was_edit: false,
                result,
            }
        }
        Request::Update { id, payload } => {
            let result = match to_body(&payload) {
                Ok(body) => api.update(R::PATH, &id, body).await,
                Err(e) => Err(e),
            };
            Outcome::Saved { was_edit: true, result }
        }
        Request::Delete { id } => Outcome::Deleted(api.delete(R::PATH, &id).await),
    }
}

fn to_body(payload: &impl serde::Serialize) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| AppError::decode(format!("request body: {e}")))
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory API used by tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// One recorded call: method, path, optional id, optional body.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub method: &'static str,
        pub path: String,
        pub id: Option<String>,
        pub body: Option<Value>,
    }

    /// Scripted response.
    pub enum Reply {
        Data(Value),
        Message(Option<String>),
        Fail(AppError),
    }

    #[derive(Default)]
    pub struct FakeApi {
        calls: Mutex<Vec<Call>>,
        replies: Mutex<VecDeque<Reply>>,
    }

    impl FakeApi {
        pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into_iter().collect()),
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, path: &str, id: Option<&str>, body: Option<Value>) -> Reply {
            self.calls.lock().unwrap().push(Call {
                method,
                path: path.to_string(),
                id: id.map(str::to_string),
                body,
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("FakeApi ran out of scripted replies")
        }
    }

    fn message(reply: Reply) -> Result<Option<String>> {
        match reply {
            Reply::Message(m) => Ok(m),
            Reply::Fail(e) => Err(e),
            Reply::Data(_) => panic!("mutation scripted with data reply"),
        }
    }

    #[async_trait]
    impl ResourceApi for FakeApi {
        async fn list(&self, path: &str) -> Result<Value> {
            match self.record("GET", path, None, None) {
                Reply::Data(v) => Ok(v),
                Reply::Fail(e) => Err(e),
                Reply::Message(_) => panic!("list scripted with message reply"),
            }
        }

        async fn create(&self, path: &str, body: Value) -> Result<Option<String>> {
            message(self.record("POST", path, None, Some(body)))
        }

        async fn update(&self, path: &str, id: &str, body: Value) -> Result<Option<String>> {
            message(self.record("PATCH", path, Some(id), Some(body)))
        }

        async fn delete(&self, path: &str, id: &str) -> Result<Option<String>> {
            message(self.record("DELETE", path, Some(id), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeApi, Reply};
    use super::*;
    use crate::controller::{DepartmentResource, ListController, Notice, TeamResource};
    use reqwest::StatusCode;
    use serde_json::json;

    /// Execute requests until the controller stops asking for more.
    async fn drive<R: Resource>(api: &FakeApi, controller: &mut ListController<R>, first: Request<R>) {
        let mut next = Some(first);
        while let Some(request) = next {
            let outcome = execute(api, request).await;
            next = controller.apply(outcome);
        }
    }

    #[tokio::test]
    async fn test_department_list_renders_one_row() {
        let api = FakeApi::new([Reply::Data(json!([{"id": "1", "name": "Engineering"}]))]);
        let mut c = ListController::<DepartmentResource>::new();

        let first = c.mount();
        drive(&api, &mut c, first).await;

        assert_eq!(c.rows().len(), 1);
        assert_eq!(c.rows()[0].name, "Engineering");
        assert_eq!(c.rows()[0].team_member_count(), 0);
        assert_eq!(api.calls()[0].method, "GET");
        assert_eq!(api.calls()[0].path, "department");
    }

    #[tokio::test]
    async fn test_delete_notifies_and_refetches() {
        let api = FakeApi::new([
            Reply::Message(Some("Department deleted!".to_string())),
            Reply::Data(json!([])),
        ]);
        let mut c = ListController::<DepartmentResource>::new();
        c.apply(Outcome::Listed(Ok(vec![
            serde_json::from_value(json!({"id": "3", "name": "Legal"})).unwrap(),
        ])));

        let row = c.rows()[0].clone();
        c.request_delete(&row);
        assert!(api.calls().is_empty());

        let request = c.confirm_delete().unwrap();
        drive(&api, &mut c, request).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].method, calls[0].id.as_deref()), ("DELETE", Some("3")));
        assert_eq!((calls[1].method, calls[1].path.as_str()), ("GET", "department"));
        assert!(c.rows().is_empty());
        assert_eq!(c.take_notices(), vec![Notice::success("Department deleted!")]);
    }

    #[tokio::test]
    async fn test_update_sends_patch_body() {
        let api = FakeApi::new([
            Reply::Message(None),
            Reply::Data(json!({"1": [{"id": "7", "name": "Ana", "designation": "CTO"}]})),
        ]);
        let mut c = ListController::<TeamResource>::new();
        let row = serde_json::from_value(json!({"id": "7", "name": "Ana", "designation": "Lead"})).unwrap();
        c.open_edit(&row);
        c.form_mut().values.designation = "CTO".to_string();

        let request = c.submit().unwrap();
        drive(&api, &mut c, request).await;

        let calls = api.calls();
        assert_eq!(calls[0].method, "PATCH");
        assert_eq!(calls[0].path, "team");
        assert_eq!(calls[0].id.as_deref(), Some("7"));
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["designation"], "CTO");
        assert!(body.get("image").is_none());
        assert_eq!(c.rows()[0].designation, "CTO");
    }

    #[tokio::test]
    async fn test_failed_create_makes_no_refetch() {
        let api = FakeApi::new([Reply::Fail(AppError::Api {
            status: StatusCode::CONFLICT,
            message: Some("Department already exists".to_string()),
        })]);
        let mut c = ListController::<DepartmentResource>::new();
        c.open_create();
        c.form_mut().values.name = "Engineering".to_string();

        let request = c.submit().unwrap();
        drive(&api, &mut c, request).await;

        assert_eq!(api.calls().len(), 1);
        assert!(c.form().open);
        assert_eq!(c.form().values.name, "Engineering");
        assert_eq!(c.take_notices(), vec![Notice::error("Department already exists")]);
    }

    #[tokio::test]
    async fn test_undecodable_list_is_reported() {
        let api = FakeApi::new([Reply::Data(json!({"not": "a list"}))]);
        let outcome = execute::<DepartmentResource>(&api, Request::List).await;
        assert!(matches!(outcome, Outcome::Listed(Err(AppError::Decode(_)))));
    }
}
