//! Built-in flow used when no document is given on the command line.

use blockflow_canvas::prelude::*;
use serde_json::json;

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap_or_default()
}

/// Builds an agent pipeline: a guarded LLM call with a retry loop.
pub fn populate<S: RenderSurface>(canvas: &mut Canvas<S>) {
    let start = canvas.add_block(
        NewBlock::new("start")
            .at(40.0, 40.0)
            .with_html("<strong>On request</strong>"),
    );
    let fetch = canvas.add_block(
        NewBlock::new("http_request")
            .with_class("net")
            .with_data(payload(json!({ "url": "https://api.example.com/items", "timeout": 30 })))
            .with_html(
                "<label>URL <input data-field=\"url\" value=\"https://api.example.com/items\"></label>",
            ),
    );
    let guard = canvas.add_block(NewBlock::new("try_catch"));
    let call = canvas.add_block(
        NewBlock::new("llm_call")
            .with_data(payload(json!({ "model": "small", "temperature": 0.2 })))
            .with_html("<p onclick=\"steal()\">Summarize the items</p><script>steal()</script>"),
    );
    let retry = canvas.add_block(NewBlock::new("loop").with_data(payload(json!({ "times": 3 }))));
    let tool = canvas.add_block(NewBlock::new("tool").with_html("<em>lookup</em>"));
    let log_err = canvas.add_block(
        NewBlock::new("log").with_html("<a href=\"javascript:alert(1)\">error details</a>"),
    );
    let done = canvas.add_block(NewBlock::new("end"));
    let notify = canvas.add_block(
        NewBlock::new("notify")
            .at(420.0, 80.0)
            .with_html("Tell the on-call channel"),
    );

    canvas.snap_below(start, fetch);
    canvas.snap_below(fetch, guard);
    canvas.snap_into_arm(guard, 0, call);
    canvas.snap_below(call, retry);
    canvas.snap_into_arm(retry, 0, tool);
    canvas.snap_into_arm(guard, 1, log_err);
    canvas.snap_below(guard, done);
    // Drawn as a curve: the catch arm hands off to a detached block.
    canvas.add_connection(Connection::stack(log_err, notify));
    canvas.field_changed(fetch, "timeout", "45", true);
}
