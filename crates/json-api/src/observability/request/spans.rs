//! Span naming and incoming trace context.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};
use uuid::Uuid;

/// Route shape of `path` with every uuid segment replaced by `{uuid}`, so
/// span names and metric labels stay low-cardinality.
pub(super) fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    match segments.join("/") {
        route if route.is_empty() => "/".to_owned(),
        route => route,
    }
}

/// The remote parent carried by W3C trace headers, if a valid one is present.
pub(super) fn parent_from_headers(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| {
        // A fresh base keeps requests without trace headers out of whatever
        // span happens to be active in-process.
        let context = propagator.extract_with_context(&Context::new(), &HeaderCarrier(headers));

        context.span().span_context().is_valid().then_some(context)
    })
}

struct HeaderCarrier<'a>(&'a HeaderMap);

impl Extractor for HeaderCarrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}
