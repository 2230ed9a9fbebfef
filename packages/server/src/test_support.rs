//! Helpers shared by unit tests.

use std::future::Future;

use metrics_util::{
    MetricKind,
    debugging::{DebugValue, DebuggingRecorder},
};

/// One metric captured by [`with_recorded_metrics`].
#[derive(Debug)]
pub(crate) struct RecordedMetric {
    pub kind: MetricKind,
    pub name: String,
    pub labels: Vec<(String, String)>,
    pub value: DebugValue,
}

impl RecordedMetric {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Run `fut` to completion on a current-thread runtime with a recorder
/// local to this thread, and return what it recorded.
///
/// A local recorder keeps parallel tests from seeing each other's metrics.
pub(crate) fn with_recorded_metrics<F: Future>(fut: F) -> (F::Output, Vec<RecordedMetric>) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let output = metrics::with_local_recorder(&recorder, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build test runtime")
            .block_on(fut)
    });

    let recorded = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, value)| RecordedMetric {
            kind: key.kind(),
            name: key.key().name().to_string(),
            labels: key
                .key()
                .labels()
                .map(|l| (l.key().to_string(), l.value().to_string()))
                .collect(),
            value,
        })
        .collect();

    (output, recorded)
}
