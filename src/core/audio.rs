/// Something that can report the analyser's current byte spectrum.
pub trait FrequencySource {
    fn bin_count(&self) -> usize;
    fn fill_byte_frequency_data(&self, out: &mut [u8]);
}

/// Builds the audio graph (context, analyser, looping source) on demand.
pub trait AudioGraphFactory {
    type Graph: FrequencySource;
    fn create(&mut self) -> anyhow::Result<Self::Graph>;
}

/// Run `build` against a freshly opened `resource`. If it fails, `release`
/// runs before the error is returned so nothing is left open.
pub fn build_or_release<R, T>(
    resource: R,
    build: impl FnOnce(&R) -> anyhow::Result<T>,
    release: impl FnOnce(&R),
) -> anyhow::Result<(R, T)> {
    match build(&resource) {
        Ok(built) => Ok((resource, built)),
        Err(e) => {
            release(&resource);
            Err(e)
        }
    }
}

/// Lazily started audio analysis. `frequency()` is polled every frame.
pub struct AudioReactive<F: AudioGraphFactory> {
    factory: F,
    graph: Option<F::Graph>,
    bins: Vec<u8>,
}

impl<F: AudioGraphFactory> AudioReactive<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            graph: None,
            bins: Vec::new(),
        }
    }

    /// Build the graph and begin playback. A second call is a no-op.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.graph.is_some() {
            return Ok(());
        }
        let graph = self.factory.create()?;
        self.bins = vec![0; graph.bin_count()];
        log::info!("[audio] started, {} frequency bins", self.bins.len());
        self.graph = Some(graph);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.graph.is_some()
    }

    /// Mean spectrum amplitude in [0, 1]; 0 until started.
    pub fn frequency(&mut self) -> f32 {
        let Some(graph) = &self.graph else {
            return 0.0;
        };
        graph.fill_byte_frequency_data(&mut self.bins);
        mean_amplitude(&self.bins)
    }
}

#[inline]
pub fn mean_amplitude(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32 / 255.0
}
