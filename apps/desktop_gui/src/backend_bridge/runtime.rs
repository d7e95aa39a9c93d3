//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use intake_core::{HttpParseTransport, IntakeSettings, ParseTransport};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: IntakeSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let transport = match HttpParseTransport::new(&settings) {
            Ok(transport) => transport,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_intake(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                tracing::error!("failed to build parsing service transport: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready; parsing service at {}",
                transport.endpoint()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Upload { ticket, request } => {
                        let outcome = transport
                            .upload(request)
                            .await
                            .map(|response| response.extracted_data);
                        // Blocking send: a dropped outcome would leave the form stuck in-flight.
                        if ui_tx.send(UiEvent::ParseFinished { ticket, outcome }).is_err() {
                            break;
                        }
                    }
                    BackendCommand::CheckHealth => {
                        let result = transport.health().await;
                        if let Err(err) = &result {
                            tracing::warn!("parsing service health check failed: {err}");
                        }
                        let _ = ui_tx.try_send(UiEvent::HealthChecked(result));
                    }
                }
            }
            tracing::info!("backend worker stopping; UI command queue closed");
        });
    });
}
