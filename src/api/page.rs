// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The single demo page.
//!
//! Rendered server-side from the current session and balances. Buttons call
//! the JSON endpoints and reload; accepted transactions pop an `alert()` with
//! the hash.

use axum::{extract::State, response::Html};

use crate::state::AppState;

const SCRIPT: &str = r#"
async function call(path, notify) {
  const res = await fetch(path, { method: 'POST' });
  const body = await res.json();
  if (!res.ok) {
    console.error(body.error);
  } else if (notify && body.message) {
    alert(body.message);
  }
  location.reload();
}
"#;

/// Render the page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let ctx = state.wallet.context();
    let balances = state.synchronizer.balances();
    let contracts = state.synchronizer.contracts();

    let account = ctx
        .account
        .map(|a| a.to_string())
        .unwrap_or_default();
    let connect_button = if ctx.connected {
        r#"<button onclick="call('/v1/session/disconnect')">Disconnect</button>"#
    } else {
        r#"<button onclick="call('/v1/session/connect')">Connect Wallet</button>"#
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Token Playground</title>
<style>
body {{ background: #000; color: #fff; font-family: sans-serif; margin: 0; }}
header {{ border-bottom: 1px solid #fff; padding: 1rem; }}
main {{ padding: 1rem; }}
h2.title {{ color: #c10000; }}
a {{ color: #fff; }}
</style>
<script>{script}</script>
</head>
<body>
<header>{connect_button} <span>{network}</span></header>
<main>
<h2>Check contract execution on <a href="{token_url}">the block explorer</a></h2>
<h4>Account: {account}</h4>
<h4>Sample Token Address: {sample_token}</h4>

<h2 class="title">Getter Function (View Function)</h2>
<h4>Eth Balance: {native}</h4>
<h4>Sample Token Balance: {sample_balance}</h4>
<h4>Wrapped Eth Balance: {wrapped_balance}</h4>
<button onclick="call('/v1/balances/refresh')">Fetch All Token</button>
<button onclick="call('/v1/balances/native/refresh')">Fetch Eth Balance</button>
<button onclick="call('/v1/balances/wrapped-ether/refresh')">Fetch Wrapped Eth Balance</button>

<h2 class="title">Setter Function (State Changing Function)</h2>
<button onclick="call('/v1/transactions/mint', true)">Mint 1 Sample Token</button>
<button onclick="call('/v1/balances/sample-token/refresh')">Fetch Sample Token Balance</button>
<button onclick="call('/v1/transactions/unwrap', true)">Unwrap 0.1 Eth</button>

<h2 class="title">Payable Function</h2>
<button onclick="call('/v1/transactions/wrap', true)">Wrap 0.1 Eth</button>
</main>
</body>
</html>
"#,
        script = SCRIPT,
        connect_button = connect_button,
        network = ctx.network.name,
        token_url = ctx.network.address_url(&contracts.sample_token),
        account = account,
        sample_token = contracts.sample_token,
        native = balances.native,
        sample_balance = balances.sample_token,
        wrapped_balance = balances.wrapped_ether,
    ))
}
