//! Publish-event hook
//!
//! Hosts feed content notifications through a channel instead of calling
//! [`SettingsService::update`] directly from their event dispatch. The listener
//! drains the channel and exits when every sender has been dropped.

use flume::Receiver;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::prelude::*;
use crate::service::SettingsService;

/// Content notifications emitted by the host
#[derive(Debug, Clone)]
pub enum ContentEvent {
	/// A content node was published or saved
	Published(ContentNode),
}

pub fn spawn_publish_listener(
	service: Arc<SettingsService>,
	events: Receiver<ContentEvent>,
) -> JoinHandle<()> {
	tokio::spawn(async move {
		while let Ok(event) = events.recv_async().await {
			match event {
				ContentEvent::Published(node) => service.update(node),
			}
		}
		debug!("publish listener stopped");
	})
}

// vim: ts=4
