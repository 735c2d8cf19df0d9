/*!
# Navigation Stack

Breadcrumb navigation for a server-rendered membership administration web
application, built in Rust.

## Overview

Every page of a module pushes its url onto a per-session stack together with a
label and an icon. Pages that finish a workflow step pop the stack and send the
visitor back to the page below. The stack collapses itself so that
back-and-forth navigation never lets it grow without bound.

## Architecture

### Core
- **navigation**: `NavigationEntry` and `NavigationStack` with the collapse and
  truncation rules
- **url_check**: url character validation and scheme/host/path comparison
- **error**: `NavigationError` and `StoreError`

### Session Layer
- **session**: `SessionStore`, session id to navigation stack with expiry
- **saving**: gzip+bincode stack files and JSON session snapshots
- **config**: server settings from arguments and environment

### Web Layer (feature `web`)
- **app**: axum routes that load, mutate and save the session stack per request

## REST API Endpoints

- `GET /nav` - Current stack as JSON
- `POST /nav/start` - Start a module (`url`, `text`, `icon` form fields)
- `POST /nav/add` - Enter a page
- `POST /nav/back` - Leave the current page and redirect to the one below
- `GET /nav/current`, `GET /nav/previous` - Redirect to the current or previous page
- `GET /nav/entry/{index}` - Url at a position of the stack
- `POST /nav/clear` - Empty the stack
*/

pub mod config;
pub mod error;
pub mod navigation;
pub mod saving;
pub mod session;
pub mod url_check;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the everyday types
pub use error::{NavigationError, StoreError};
pub use navigation::{NavigationEntry, NavigationStack};
pub use session::SessionStore;
