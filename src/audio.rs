use crate::core::audio::{build_or_release, AudioGraphFactory, AudioReactive, FrequencySource};
use crate::core::constants::ANALYSER_FFT_SIZE;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub type SharedAudio = Rc<RefCell<AudioReactive<WebAudioFactory>>>;

/// Looping background track routed through an analyser to the speakers.
pub struct WebAudioGraph {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    _element: web::HtmlAudioElement,
    _source: web::MediaElementAudioSourceNode,
}

impl FrequencySource for WebAudioGraph {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn fill_byte_frequency_data(&self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }
}

impl Drop for WebAudioGraph {
    fn drop(&mut self) {
        _ = self.ctx.close();
    }
}

pub struct WebAudioFactory {
    src: String,
}

impl WebAudioFactory {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl AudioGraphFactory for WebAudioFactory {
    type Graph = WebAudioGraph;

    fn create(&mut self) -> anyhow::Result<WebAudioGraph> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("AudioContext: {:?}", e))?;
        let (ctx, (analyser, element, source)) =
            build_or_release(ctx, |ctx| connect_graph(ctx, &self.src), |ctx| {
                _ = ctx.close();
            })?;

        _ = ctx.resume();
        match element.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] playback refused: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] play() failed: {:?}", e),
        }

        Ok(WebAudioGraph {
            ctx,
            analyser,
            _element: element,
            _source: source,
        })
    }
}

/// Wire `src` through a fresh analyser into the context's destination.
fn connect_graph(
    ctx: &web::AudioContext,
    src: &str,
) -> anyhow::Result<(
    web::AnalyserNode,
    web::HtmlAudioElement,
    web::MediaElementAudioSourceNode,
)> {
    let analyser = ctx
        .create_analyser()
        .map_err(|e| anyhow::anyhow!("AnalyserNode: {:?}", e))?;
    analyser.set_fft_size(ANALYSER_FFT_SIZE);

    let element = web::HtmlAudioElement::new_with_src(src)
        .map_err(|e| anyhow::anyhow!("Audio element: {:?}", e))?;
    element.set_cross_origin(Some("anonymous"));
    element.set_loop(true);
    let source = ctx
        .create_media_element_source(&element)
        .map_err(|e| anyhow::anyhow!("MediaElementAudioSourceNode: {:?}", e))?;

    // source -> analyser -> speakers
    source
        .connect_with_audio_node(&analyser)
        .map_err(|e| anyhow::anyhow!("connect source: {:?}", e))?;
    analyser
        .connect_with_audio_node(&ctx.destination())
        .map_err(|e| anyhow::anyhow!("connect analyser: {:?}", e))?;
    Ok((analyser, element, source))
}

pub fn shared(src: &str) -> SharedAudio {
    Rc::new(RefCell::new(AudioReactive::new(WebAudioFactory::new(src))))
}

/// Start audio from a user gesture. Failures are logged, not propagated.
pub fn start(audio: &SharedAudio) {
    if let Err(e) = audio.borrow_mut().start() {
        log::error!("[audio] start failed: {:?}", e);
    }
}
