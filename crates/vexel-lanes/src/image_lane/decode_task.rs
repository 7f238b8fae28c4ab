// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A one-shot background decode with a blocking rendezvous.

use std::thread::{self, JoinHandle};
use vexel_core::error::{LoaderError, LoaderResult};

/// A decode running on its own thread.
///
/// There is no cancellation: once spawned the job runs to completion, and
/// [`DecodeTask::wait`] only blocks until it has.
#[derive(Debug)]
pub struct DecodeTask<T: Send + 'static> {
    handle: JoinHandle<LoaderResult<T>>,
}

impl<T: Send + 'static> DecodeTask<T> {
    /// Spawns `job` on a named thread.
    ///
    /// If the thread cannot be spawned the job is handed back so the caller
    /// can run it inline.
    pub fn spawn<F>(name: &str, job: F) -> Result<Self, F>
    where
        F: FnOnce() -> LoaderResult<T> + Send + Clone + 'static,
    {
        let fallback = job.clone();
        match thread::Builder::new().name(name.to_string()).spawn(job) {
            Ok(handle) => Ok(Self { handle }),
            Err(e) => {
                log::warn!("Failed to spawn decode thread '{name}': {e}");
                Err(fallback)
            }
        }
    }

    /// Returns `true` once the job has finished and `wait` would not block.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the job has finished and returns its result.
    pub fn wait(self) -> LoaderResult<T> {
        self.handle
            .join()
            .map_err(|_| LoaderError::Task("decode thread panicked".to_string()))?
    }
}
