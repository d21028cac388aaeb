//! Plantillas IaC opcionales aplicadas al crear la organización.
//!
//! Una referencia `https://...` se descarga tal cual; cualquier otra cosa es
//! el nombre de un payload del store. En ambos casos el contenido debe ser
//! texto UTF-8.
use std::sync::Arc;

use crate::clients::{ClientError, PayloadStore, TemplateFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    Url(String),
    Payload(String),
}

impl TemplateRef {
    /// `None` para referencias vacías (sin plantilla).
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            None
        } else if reference.starts_with("https://") {
            Some(TemplateRef::Url(reference.to_string()))
        } else {
            Some(TemplateRef::Payload(reference.to_string()))
        }
    }
}

#[derive(Clone)]
pub struct TemplateLoader {
    fetcher: Arc<dyn TemplateFetcher>,
    payloads: Arc<dyn PayloadStore>,
}

impl TemplateLoader {
    pub fn new(fetcher: Arc<dyn TemplateFetcher>, payloads: Arc<dyn PayloadStore>) -> Self {
        Self { fetcher, payloads }
    }

    pub fn load(&self, reference: &TemplateRef) -> Result<String, ClientError> {
        let (endpoint, bytes) = match reference {
            TemplateRef::Url(url) => ("template", self.fetcher.fetch(url)?),
            TemplateRef::Payload(name) => ("payload", self.payloads.get(name)?),
        };
        String::from_utf8(bytes).map_err(|e| ClientError::Decode { endpoint: endpoint.to_string(),
                                                                  reason: format!("template is not UTF-8: {e}") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl TemplateFetcher for Calls {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, ClientError> {
            self.0.lock().unwrap().push(format!("fetch:{url}"));
            Ok(b"version: 3\n".to_vec())
        }
    }

    impl PayloadStore for Calls {
        fn get(&self, name: &str) -> Result<Vec<u8>, ClientError> {
            self.0.lock().unwrap().push(format!("payload:{name}"));
            Ok(vec![0xff, 0xfe])
        }
    }

    #[test]
    fn parse_distinguishes_urls_from_payload_names() {
        assert_eq!(TemplateRef::parse("https://x.io/t.yaml"), Some(TemplateRef::Url("https://x.io/t.yaml".into())));
        assert_eq!(TemplateRef::parse("base-org"), Some(TemplateRef::Payload("base-org".into())));
        assert_eq!(TemplateRef::parse("http://x.io/t"), Some(TemplateRef::Payload("http://x.io/t".into())));
        assert_eq!(TemplateRef::parse("  "), None);
    }

    #[test]
    fn load_routes_to_the_right_collaborator() {
        let calls = Arc::new(Calls::default());
        let loader = TemplateLoader::new(calls.clone(), calls.clone());
        assert_eq!(loader.load(&TemplateRef::Url("https://x.io/t".into())).unwrap(), "version: 3\n");
        let err = loader.load(&TemplateRef::Payload("bin".into())).unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
        assert_eq!(*calls.0.lock().unwrap(), vec!["fetch:https://x.io/t", "payload:bin"]);
    }
}
