//! Bridge from `tracing` spans to Micromegas thread-local spans.
//!
//! Two span families reach the Micromegas timeline through this layer:
//! Bevy's "schedule" spans (emitted with the `trace` feature), labelled by
//! their `name` field, and the "enemy_turn" span opened around each turn's
//! planning pass. Everything else is ignored.

use micromegas_tracing::dispatch::{on_begin_named_scope, on_end_named_scope};
use micromegas_tracing::intern_string::intern_string;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

micromegas_tracing::static_span_location!(BRIDGE_LOCATION);

const SCHEDULE_SPAN: &str = "schedule";
const TURN_SPAN: &str = "enemy_turn";

/// Interned label stored in a bridged span's extensions.
struct BridgedSpan {
    label: &'static str,
}

/// Pulls the `name` field out of a schedule span.
#[derive(Default)]
struct NameVisitor {
    name: Option<String>,
}

impl Visit for NameVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "name" {
            self.name = Some(format!("{:?}", value));
        }
    }
}

/// Micromegas scope label for a span, or `None` when it is not bridged.
fn bridged_label(span_name: &str, name_field: Option<String>) -> Option<String> {
    match span_name {
        SCHEDULE_SPAN => Some(name_field.unwrap_or_default()),
        TURN_SPAN => Some(TURN_SPAN.to_string()),
        _ => None,
    }
}

pub struct MicromegasBridgeLayer;

impl<S> Layer<S> for MicromegasBridgeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let span_name = attrs.metadata().name();
        if span_name != SCHEDULE_SPAN && span_name != TURN_SPAN {
            return;
        }

        let mut visitor = NameVisitor::default();
        attrs.record(&mut visitor);
        let Some(label) = bridged_label(span_name, visitor.name) else {
            return;
        };

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(BridgedSpan {
                label: intern_string(&label),
            });
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(data) = span.extensions().get::<BridgedSpan>() {
                on_begin_named_scope(&BRIDGE_LOCATION, data.label);
            }
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(data) = span.extensions().get::<BridgedSpan>() {
                on_end_named_scope(&BRIDGE_LOCATION, data.label);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_spans_use_their_name_field() {
        assert_eq!(
            bridged_label("schedule", Some("Update".to_string())),
            Some("Update".to_string())
        );
        assert_eq!(bridged_label("schedule", None), Some(String::new()));
    }

    #[test]
    fn turn_spans_keep_their_own_name() {
        assert_eq!(
            bridged_label("enemy_turn", Some("ignored".to_string())),
            Some("enemy_turn".to_string())
        );
    }

    #[test]
    fn other_spans_are_not_bridged() {
        assert_eq!(bridged_label("system", Some("apply_pending_moves".to_string())), None);
    }
}
