//! Session: the navigation stack, pending alerts and the remote calls that
//! drive them.
//!
//! Every operation follows the same shape:
//! 1. lock, validate against the target screen, mark it busy, unlock
//! 2. await the remote call, racing it against the screen's cancellation token
//! 3. lock again and apply the result only if the screen is still on the stack
//!
//! The state lock is never held across an await. User-facing errors are
//! queued as alerts before being returned to the caller.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::cloud::{NetworkActivity, SharedClient};
use crate::error::{AppError, Result};
use crate::local::SharedLocalStore;
use crate::models::{
    Alert, AlertAction, AlertQueue, FileKind, SessionView, BUTTON_OK, TITLE_ERROR,
};
use crate::navigation::{
    DirectoryPicker, ExportJob, ExportTrigger, FileCreator, HostScreen, Navigator,
    RemoteDirectoryLister, Screen, ScreenHandle,
};
use crate::path;

pub type SharedSession = Arc<Session>;

#[derive(Debug, Default)]
struct SessionState {
    navigator: Navigator,
    alerts: AlertQueue,
}

impl SessionState {
    fn token(&self, handle: ScreenHandle) -> Result<CancellationToken> {
        self.navigator
            .token(handle)
            .ok_or(AppError::ScreenNotFound(handle))
    }

    /// Queues an alert for `error` if the user should see it.
    fn report(&mut self, error: &AppError, on_dismiss: AlertAction) {
        if error.is_user_facing() {
            tracing::warn!("{}", error);
            self.alerts.push_error(error, on_dismiss);
        } else {
            tracing::debug!("{}", error);
        }
    }
}

pub struct Session {
    state: Mutex<SessionState>,
    client: Option<SharedClient>,
    local: SharedLocalStore,
    activity: NetworkActivity,
}

async fn until_cancelled<T>(
    token: &CancellationToken,
    handle: ScreenHandle,
    call: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled(handle)),
        result = call => result,
    }
}

/// Screen path as stored on the stack: `/` stays as is, anything else is normalized.
fn stored_path(remote: &str) -> Result<String> {
    if remote == path::ROOT {
        Ok(path::ROOT.to_string())
    } else {
        path::normalize(remote)
    }
}

impl Session {
    /// `client` is `None` while no cloud account is linked.
    pub fn new(
        client: Option<SharedClient>,
        local: SharedLocalStore,
        activity: NetworkActivity,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            client,
            local,
            activity,
        }
    }

    fn with_state<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SessionState) -> Result<T>,
    {
        let mut state = self.state.lock().map_err(|_| AppError::lock_poisoned())?;
        f(&mut state)
    }

    pub fn network_active(&self) -> bool {
        self.activity.is_visible()
    }

    pub fn snapshot(&self) -> Result<SessionView> {
        self.with_state(|st| {
            Ok(SessionView {
                screens: st.navigator.views(),
                alerts: st.alerts.pending().to_vec(),
                network_active: self.activity.is_visible(),
            })
        })
    }

    pub fn top_screen(&self) -> Result<Option<ScreenHandle>> {
        self.with_state(|st| Ok(st.navigator.top_handle()))
    }

    /// Pushes a screen owned by the embedding application, e.g. the editor.
    pub fn push_host(&self, name: impl Into<String>) -> Result<ScreenHandle> {
        let name = name.into();
        self.with_state(|st| Ok(st.navigator.push(Screen::Host(HostScreen { name }))))
    }

    /// Pops the top screen, never the last one.
    pub fn back(&self) -> Result<Option<ScreenHandle>> {
        self.with_state(|st| {
            if st.navigator.len() <= 1 {
                return Ok(None);
            }
            Ok(st.navigator.pop())
        })
    }

    /// Removes an alert and applies its dismiss action.
    pub fn dismiss_alert(&self, id: u64) -> Result<Alert> {
        self.with_state(|st| {
            let alert = st.alerts.take(id).ok_or(AppError::AlertNotFound(id))?;
            match alert.on_dismiss {
                AlertAction::None => {}
                AlertAction::PopScreen(handle) => {
                    st.navigator.pop_screen(handle);
                }
                AlertAction::PopTo(handle) => {
                    st.navigator.pop_to(handle);
                }
            }
            Ok(alert)
        })
    }

    // ---- directory picker ----

    /// Opens a picker at `remote` to choose where `file_name` goes. Unwinds to
    /// `source` once the export ends.
    pub async fn open_picker(
        &self,
        source: ScreenHandle,
        remote: &str,
        file_name: &str,
        payload: impl Into<Arc<[u8]>>,
    ) -> Result<ScreenHandle> {
        let remote = stored_path(remote)?;
        path::validate_name(file_name)?;

        let job = ExportJob {
            source,
            file_name: file_name.to_string(),
            payload: payload.into(),
        };
        let (handle, needs_fetch) = self.with_state(|st| {
            if !st.navigator.contains(source) {
                return Err(AppError::ScreenNotFound(source));
            }
            let picker = DirectoryPicker::new(remote, job);
            let needs_fetch = picker.needs_fetch();
            Ok((st.navigator.push(Screen::Picker(picker)), needs_fetch))
        })?;

        if needs_fetch {
            self.load_picker(handle).await?;
        }
        Ok(handle)
    }

    /// Fetches the picker's listing again.
    pub async fn refresh_picker(&self, handle: ScreenHandle) -> Result<()> {
        self.load_picker(handle).await
    }

    async fn load_picker(&self, handle: ScreenHandle) -> Result<()> {
        let request = self.with_state(|st| {
            let token = st.token(handle)?;
            // The `/` picker only ever shows its synthetic row
            if st.navigator.picker_mut(handle)?.current_path() == path::ROOT {
                return Ok(None);
            }
            let Some(client) = self.client.clone() else {
                let err = AppError::ClientUnavailable;
                st.report(&err, AlertAction::None);
                return Err(err);
            };
            let picker = st.navigator.picker_mut(handle)?;
            picker.begin_request(handle)?;
            Ok(Some((picker.current_path().to_string(), token, client)))
        })?;
        let Some((remote, token, client)) = request else {
            return Ok(());
        };

        let lister = RemoteDirectoryLister::new(client, self.activity.clone());
        let result = until_cancelled(&token, handle, lister.list(&remote)).await;

        self.with_state(|st| {
            let Ok(picker) = st.navigator.picker_mut(handle) else {
                tracing::debug!("Dropping listing of {:?} for closed screen {}", remote, handle);
                return Err(AppError::Cancelled(handle));
            };
            match result {
                Ok(children) => {
                    tracing::debug!("{} directories under {:?}", children.len(), remote);
                    picker.finish_load(children);
                    Ok(())
                }
                Err(e) => {
                    let on_dismiss = match e {
                        AppError::EmptyResult(_) => {
                            picker.finish_load(Vec::new());
                            AlertAction::PopScreen(handle)
                        }
                        _ => {
                            picker.abandon_load();
                            AlertAction::None
                        }
                    };
                    st.report(&e, on_dismiss);
                    Err(e)
                }
            }
        })
    }

    pub fn select_row(&self, handle: ScreenHandle, index: usize) -> Result<()> {
        self.with_state(|st| st.navigator.picker_mut(handle)?.select_row(index))
    }

    pub fn toggle_row(&self, handle: ScreenHandle, index: usize) -> Result<()> {
        self.with_state(|st| st.navigator.picker_mut(handle)?.toggle_row(index))
    }

    /// Pushes a picker for row `index` of `handle` and loads it.
    pub async fn drill_into(&self, handle: ScreenHandle, index: usize) -> Result<ScreenHandle> {
        let (child, needs_fetch) = self.with_state(|st| {
            let picker = st.navigator.picker_mut(handle)?;
            let child_path = picker.drill_into(index)?;
            let child = DirectoryPicker::new(child_path, picker.job().clone());
            let needs_fetch = child.needs_fetch();
            tracing::debug!("Drilling from {:?} into {:?}", picker.current_path(), child.current_path());
            Ok((st.navigator.push(Screen::Picker(child)), needs_fetch))
        })?;

        if needs_fetch {
            self.load_picker(child).await?;
        }
        Ok(child)
    }

    /// Exports the payload into the selected row's directory.
    ///
    /// Success unwinds to the source screen. Failure shows an alert whose
    /// dismissal unwinds to the source screen as well.
    pub async fn confirm_selection(&self, handle: ScreenHandle) -> Result<()> {
        let (destination, job, token, client) = self.with_state(|st| {
            let token = st.token(handle)?;
            let picker = st.navigator.picker_mut(handle)?;
            let destination = match picker.confirm_selection() {
                Ok(destination) => destination,
                Err(e) => {
                    st.report(&e, AlertAction::None);
                    return Err(e);
                }
            };
            let Some(client) = self.client.clone() else {
                let err = AppError::ClientUnavailable;
                st.report(&err, AlertAction::None);
                return Err(err);
            };
            picker.begin_request(handle)?;
            Ok((destination, picker.job().clone(), token, client))
        })?;

        let trigger = ExportTrigger::new(client, self.activity.clone());
        let result = until_cancelled(&token, handle, trigger.export(&destination, &job.payload)).await;

        self.with_state(|st| {
            let Ok(picker) = st.navigator.picker_mut(handle) else {
                tracing::debug!("Dropping export result for closed screen {}", handle);
                return Err(AppError::Cancelled(handle));
            };
            picker.end_request();
            match result {
                Ok(()) => {
                    tracing::info!("Exported {} to {}", job.file_name, destination);
                    st.navigator.pop_to(job.source);
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!("Export of {} to {} failed: {}", job.file_name, destination, e);
                    st.alerts.push(
                        TITLE_ERROR.to_string(),
                        format!("Could not export \"{}\".", job.file_name),
                        vec![BUTTON_OK.to_string()],
                        AlertAction::PopTo(job.source),
                    );
                    Err(e)
                }
            }
        })
    }

    // ---- file creator ----

    pub fn open_creator(&self, remote: &str) -> Result<ScreenHandle> {
        let remote = stored_path(remote)?;
        self.with_state(|st| {
            Ok(st
                .navigator
                .push(Screen::Creator(FileCreator::new(remote))))
        })
    }

    pub fn edit_creator(
        &self,
        handle: ScreenHandle,
        name: Option<String>,
        kind: Option<FileKind>,
    ) -> Result<()> {
        self.with_state(|st| {
            let creator = st.navigator.creator_mut(handle)?;
            if let Some(name) = name {
                creator.set_name(handle, name)?;
            }
            if let Some(kind) = kind {
                creator.select_kind(handle, kind)?;
            }
            Ok(())
        })
    }

    /// Validates the form and issues a single create call.
    ///
    /// Validation failures keep the form open. Once the call completes the
    /// form is popped: immediately on success, after the alert otherwise.
    pub async fn submit_creator(&self, handle: ScreenHandle) -> Result<()> {
        let (request, token, client) = self.with_state(|st| {
            let token = st.token(handle)?;
            let creator = st.navigator.creator_mut(handle)?;
            let request = match creator.submit(handle, self.local.as_ref()) {
                Ok(request) => request,
                Err(e) => {
                    st.report(&e, AlertAction::None);
                    return Err(e);
                }
            };
            let Some(client) = self.client.clone() else {
                creator.reopen();
                let err = AppError::ClientUnavailable;
                st.report(&err, AlertAction::None);
                return Err(err);
            };
            Ok((request, token, client))
        })?;

        let call = async {
            let _activity = self.activity.begin();
            tracing::info!("Creating {:?} {}", request.kind, request.remote_path);
            match request.kind {
                FileKind::File => client.upload_file(&request.remote_path, &[]).await,
                FileKind::Directory => client.create_folder(&request.remote_path).await,
            }
        };
        let result = until_cancelled(&token, handle, call).await;

        self.with_state(|st| {
            let Ok(creator) = st.navigator.creator_mut(handle) else {
                tracing::debug!("Dropping create result for closed screen {}", handle);
                return Err(AppError::Cancelled(handle));
            };
            creator.finish(result.is_ok());
            match result {
                Ok(()) => {
                    st.navigator.pop_screen(handle);
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!("Create {} failed: {}", request.remote_path, e);
                    st.alerts.push(
                        TITLE_ERROR.to_string(),
                        format!("Could not create \"{}\".", request.name),
                        vec![BUTTON_OK.to_string()],
                        AlertAction::PopScreen(handle),
                    );
                    Err(e)
                }
            }
        })
    }
}
