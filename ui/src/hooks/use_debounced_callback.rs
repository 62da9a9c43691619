use std::time::Duration;

use client_state::Debouncer;
use yew::prelude::*;

use crate::timer::GlooTimer;

/// Wrap `callback` so that it only fires once `delay` has passed without
/// another emit. Pending emits are dropped on unmount.
#[hook]
pub fn use_debounced_callback<V: 'static>(
    delay: Duration,
    callback: Callback<V>,
) -> Callback<V> {
    let debouncer = use_memo(delay, |delay| Debouncer::new(GlooTimer, *delay));

    {
        let debouncer = debouncer.clone();
        use_effect_with(delay, move |_| move || debouncer.cancel());
    }

    Callback::from(move |value: V| {
        let pending = debouncer.call(value);
        let callback = callback.clone();
        yew::platform::spawn_local(async move {
            if let Some(value) = pending.await {
                callback.emit(value);
            }
        });
    })
}
