//! Test fakes shared by unit tests

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::oneshot;

use crate::constants::{COMPANY_CONTAINER_ID, COMPANY_ID_ATTRIBUTE, DATE_INPUT_ID};
use crate::domain::farm::{FarmVolumeRecord, FarmVolumesRequest, FarmVolumesResponse};
use crate::error::{Error, Result};
use crate::page::{Document, Element, SharedDocument};
use crate::services::{FarmDataSource, ReportDocument, ReportRequest};

/// Scripted reply for one request
pub enum Reply {
    Now(Result<FarmVolumesResponse>),
    Gated(oneshot::Receiver<Result<FarmVolumesResponse>>),
}

/// Data source answering requests from a queue
#[derive(Default)]
pub struct MockSource {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<FarmVolumesRequest>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Result<FarmVolumesResponse>) {
        self.replies.lock().push_back(Reply::Now(reply));
    }

    pub fn push_records(&self, records: Vec<FarmVolumeRecord>) {
        self.push(Ok(FarmVolumesResponse::ok(records)));
    }

    /// Queue a reply released through the returned sender
    pub fn push_gated(&self) -> oneshot::Sender<Result<FarmVolumesResponse>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<FarmVolumesRequest> {
        self.requests.lock().clone()
    }
}

impl FarmDataSource for MockSource {
    fn fetch_farm_volumes<'a>(
        &'a self,
        request: &'a FarmVolumesRequest,
    ) -> BoxFuture<'a, Result<FarmVolumesResponse>> {
        self.requests.lock().push(request.clone());
        let reply = self.replies.lock().pop_front();
        Box::pin(async move {
            match reply {
                Some(Reply::Now(result)) => result,
                Some(Reply::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                    Err(Error::Transport {
                        message: "gate dropped".into(),
                        connectivity: false,
                    })
                }),
                None => Err(Error::Transport {
                    message: "no scripted reply".into(),
                    connectivity: false,
                }),
            }
        })
    }

    fn fetch_daily_report<'a>(
        &'a self,
        _request: &'a ReportRequest,
    ) -> BoxFuture<'a, Result<ReportDocument>> {
        Box::pin(async {
            Err(Error::Http {
                status: 404,
                message: "not scripted".into(),
            })
        })
    }
}

/// Production page with a company and a date selected
pub fn production_page(company_id: &str, date: &str) -> SharedDocument {
    Document::new("/production/daily")
        .with_element(
            Element::new("div")
                .with_id(COMPANY_CONTAINER_ID)
                .with_attr(COMPANY_ID_ATTRIBUTE, company_id),
        )
        .with_element(Element::new("input").with_id(DATE_INPUT_ID).with_value(date))
        .with_element(Element::new("div").with_id("dailyVolumeChart"))
        .into_shared()
}

pub fn two_farms() -> Vec<FarmVolumeRecord> {
    vec![
        FarmVolumeRecord::new("farm1", "Farm 1", 100.0),
        FarmVolumeRecord::new("farm2", "Farm 2", 200.0),
    ]
}
