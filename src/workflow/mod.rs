//! Classification workflow: walks the identification queue, one label at a time.
//!
//! ```text
//! Loading ──load──▶ Ready ──select──▶ Submitting ──▶ Ready (next item)
//!                     ▲                    │
//!                     └──── load ◀── Done ◀┘ (cursor past the end)
//! ```

pub mod skip;

use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::models::*;

/// Remote operations the workflow depends on.
#[allow(async_fn_in_trait)]
pub trait LabelingApi {
    async fn load_queue(&self, page_size: u32) -> Result<Vec<Identification>, ClientError>;
    async fn load_catalog(&self, page_size: u32) -> Result<Vec<ObjectDefinition>, ClientError>;
    async fn submit(&self, identification_id: Uuid, label: &str) -> Result<(), ClientError>;
}

impl LabelingApi for ApiClient {
    async fn load_queue(&self, page_size: u32) -> Result<Vec<Identification>, ClientError> {
        self.list_ai_identifications(page_size).await
    }

    async fn load_catalog(&self, page_size: u32) -> Result<Vec<ObjectDefinition>, ClientError> {
        self.list_objects(page_size).await
    }

    async fn submit(&self, identification_id: Uuid, label: &str) -> Result<(), ClientError> {
        self.submit_identification(identification_id, label).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitting,
    Done,
}

/// Result of a selection attempt.
#[derive(Debug)]
pub enum Selection {
    /// Nothing was submitted and no state changed.
    Ignored,
    Answered {
        identification_id: Uuid,
        label: String,
        /// Following items auto-answered with `"null"` by a skip rule.
        auto_nulled: usize,
        /// First follow-up submission that failed, if any. The cursor stops on
        /// the item that failed so it can be answered by hand.
        follow_up_error: Option<ClientError>,
    },
}

#[derive(Debug)]
pub struct ClassificationWorkflow {
    page_size: u32,
    queue: Vec<Identification>,
    options: Vec<LabelOption>,
    cursor: usize,
    phase: Phase,
    image_loading: bool,
}

impl ClassificationWorkflow {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            queue: Vec::new(),
            options: Vec::new(),
            cursor: 0,
            phase: Phase::Loading,
            image_loading: false,
        }
    }

    /// Build a ready workflow from already fetched data.
    pub fn with_data(queue: Vec<Identification>, objects: &[ObjectDefinition]) -> Self {
        let mut workflow = Self::new(crate::config::DEFAULT_PAGE_SIZE);
        workflow.install(queue, objects);
        workflow
    }

    /// Fetch the queue and the catalog concurrently and start from the top.
    ///
    /// On failure the previous queue, cursor and phase are kept. A workflow
    /// that never loaded stays in [`Phase::Loading`].
    pub async fn load<A: LabelingApi>(&mut self, api: &A) -> Result<(), ClientError> {
        let previous = std::mem::replace(&mut self.phase, Phase::Loading);
        let loaded = tokio::try_join!(
            api.load_queue(self.page_size),
            api.load_catalog(self.page_size)
        );
        let (queue, objects) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                // The current queue stays usable after a failed reload.
                self.phase = previous;
                return Err(e);
            }
        };
        self.install(queue, &objects);
        tracing::info!(
            queued = self.queue.len(),
            options = self.options.len(),
            "Classification queue loaded"
        );
        Ok(())
    }

    fn install(&mut self, queue: Vec<Identification>, objects: &[ObjectDefinition]) {
        self.queue = queue
            .into_iter()
            .filter(|item| item.object != IMAGE_DESCRIPTION)
            .collect();
        self.options = derive_label_options(objects);
        self.cursor = 0;
        if self.queue.is_empty() {
            self.phase = Phase::Done;
            self.image_loading = false;
        } else {
            self.phase = Phase::Ready;
            self.image_loading = true;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn queue(&self) -> &[Identification] {
        &self.queue
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// One-based position and queue length, for "image x of y".
    pub fn progress(&self) -> (usize, usize) {
        ((self.cursor + 1).min(self.queue.len()), self.queue.len())
    }

    pub fn is_image_loading(&self) -> bool {
        self.image_loading
    }

    /// The current image finished loading; selections are accepted again.
    pub fn image_loaded(&mut self) {
        self.image_loading = false;
    }

    pub fn current(&self) -> Option<&Identification> {
        match self.phase {
            Phase::Ready | Phase::Submitting => self.queue.get(self.cursor),
            Phase::Loading | Phase::Done => None,
        }
    }

    /// Options for the current item: the labels of its object type.
    pub fn current_options(&self) -> Vec<&LabelOption> {
        match self.current() {
            Some(item) => self
                .options
                .iter()
                .filter(|option| option.object_slug == item.object)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Map a key press (`'1'`..=`'9'`) to an option index for the current item.
    pub fn option_for_key(&self, key: char) -> Option<usize> {
        let digit = key.to_digit(10)? as usize;
        if digit == 0 || digit > self.current_options().len() {
            return None;
        }
        Some(digit - 1)
    }

    /// Select by key press. Unmapped keys are ignored.
    pub async fn select_key<A: LabelingApi>(
        &mut self,
        api: &A,
        key: char,
    ) -> Result<Selection, ClientError> {
        match self.option_for_key(key) {
            Some(index) => self.select(api, index).await,
            None => Ok(Selection::Ignored),
        }
    }

    /// Submit option `index` for the current item, apply the skip rules and
    /// advance.
    ///
    /// Ignored unless the workflow is ready and the image has loaded. When the
    /// submission fails the cursor does not move.
    pub async fn select<A: LabelingApi>(
        &mut self,
        api: &A,
        index: usize,
    ) -> Result<Selection, ClientError> {
        if self.phase != Phase::Ready || self.image_loading {
            return Ok(Selection::Ignored);
        }
        let Some(label) = self
            .current_options()
            .get(index)
            .map(|option| option.value.clone())
        else {
            return Ok(Selection::Ignored);
        };
        let identification_id = self.queue[self.cursor].id;

        self.phase = Phase::Submitting;
        if let Err(e) = api.submit(identification_id, &label).await {
            tracing::warn!(%identification_id, "Submission failed: {}", e);
            self.phase = Phase::Ready;
            return Err(e);
        }

        let mut step = 1;
        let mut follow_up_error = None;
        for idx in skip::dependents(&self.queue, self.cursor, &label) {
            let dependent_id = self.queue[idx].id;
            match api.submit(dependent_id, NULL_LABEL).await {
                Ok(()) => step += 1,
                Err(e) => {
                    tracing::warn!(%dependent_id, "Skip-rule submission failed: {}", e);
                    follow_up_error = Some(e);
                    break;
                }
            }
        }

        self.advance(step);
        Ok(Selection::Answered {
            identification_id,
            label,
            auto_nulled: step - 1,
            follow_up_error,
        })
    }

    fn advance(&mut self, step: usize) {
        let previous_url = self.queue[self.cursor].image_url().to_string();
        self.cursor += step;
        match self.queue.get(self.cursor) {
            Some(next) => {
                self.phase = Phase::Ready;
                if next.image_url() != previous_url {
                    self.image_loading = true;
                }
            }
            None => {
                self.phase = Phase::Done;
                self.image_loading = false;
                tracing::info!("No more images to classify");
            }
        }
    }
}
