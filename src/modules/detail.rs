//! Extrinsic detail: the extrinsic with its events and calls

use serde::Serialize;

use crate::domain::filter::FilterExpr;
use crate::domain::resource::Resource;
use crate::error::QueryError;
use crate::infrastructure::archive::{Archive, Call, Event, Extrinsic};

/// Child rows per detail list
pub const DETAIL_LIST_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct ExtrinsicDetail {
    pub extrinsic: Resource<Extrinsic>,
    pub events: Resource<Vec<Event>>,
    pub calls: Resource<Vec<Call>>,
}

#[derive(Serialize)]
struct DetailView<'a> {
    extrinsic: Option<&'a Extrinsic>,
    events: &'a [Event],
    calls: &'a [Call],
    errors: Vec<String>,
}

impl ExtrinsicDetail {
    /// JSON rendering for the command line
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let errors = [
            self.extrinsic.error(),
            self.events.error(),
            self.calls.error(),
        ]
        .into_iter()
        .flatten()
        .map(ToString::to_string)
        .collect();

        serde_json::to_value(DetailView {
            extrinsic: self.extrinsic.data(),
            events: self.events.items(),
            calls: self.calls.items(),
            errors,
        })
    }
}

/// Load all three parts concurrently; each settles on its own
pub async fn load_extrinsic_detail(archive: &Archive, id: &str) -> Result<ExtrinsicDetail, QueryError> {
    let by_id = FilterExpr::eq("id", id);
    let by_parent = FilterExpr::relation("extrinsic", FilterExpr::eq("id", id));

    let extrinsics = archive.extrinsics();
    let events = archive.events();
    let calls = archive.calls();

    let (extrinsic, events, calls) = futures::join!(
        extrinsics.first(&by_id),
        events.list(DETAIL_LIST_LIMIT, 0, Some(&by_parent), Some("id_ASC")),
        calls.list(DETAIL_LIST_LIMIT, 0, Some(&by_parent), Some("id_ASC"))
    );

    Ok(ExtrinsicDetail {
        extrinsic: Resource::settle(extrinsic)?,
        events: Resource::settle(events.map(Some))?,
        calls: Resource::settle(calls.map(Some))?,
    })
}
