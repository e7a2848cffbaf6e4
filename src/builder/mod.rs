mod qr;

pub use qr::{Module, QR};

use log::{debug, info};

use crate::common::{
    codec::{encode_payload, CharacterSet, Mode},
    ec::interleave_with_ec_bytes,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

/// Fluent configuration for one symbol. Unset version, mask & mode are chosen
/// automatically.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    text: &'a str,
    version: Option<Version>,
    ec_level: ECLevel,
    charset: CharacterSet,
    mask: Option<MaskPattern>,
    mode: Option<Mode>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            version: None,
            ec_level: ECLevel::L,
            charset: CharacterSet::default(),
            mask: None,
            mode: None,
        }
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.text = text;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn charset(&mut self, charset: CharacterSet) -> &mut Self {
        self.charset = charset;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {}, Ec level: {:?}, Charset: {} }}",
                *v,
                self.ec_level,
                self.charset.name()
            ),
            None => format!(
                "{{ Version: None, Ec level: {:?}, Charset: {} }}",
                self.ec_level,
                self.charset.name()
            ),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        info!("Generating QR {}", self.metadata());
        if self.text.is_empty() {
            return Err(QRError::EmptyData);
        }

        let (data, plan) =
            encode_payload(self.text, self.ec_level, self.charset, self.version, self.mode)?;

        debug!(
            "Interleaving {} data bytes into {} blocks, {} ec bytes total",
            plan.data_bytes, plan.rs_blocks, plan.ec_bytes_total
        );
        let payload = interleave_with_ec_bytes(&data, plan.total_bytes, plan.data_bytes, plan.rs_blocks)?;

        let mut qr = QR::new(plan.version, plan.ec_level, plan.mode);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload)?;

        match self.mask {
            Some(m) => {
                debug!("Applying mask {}", *m);
                qr.apply_mask(m);
            }
            None => {
                apply_best_mask(&mut qr);
            }
        }

        if !qr.is_complete() {
            return Err(QRError::IncompleteMatrix);
        }

        let total_modules = plan.matrix_width * plan.matrix_width;
        let dark_modules = qr.count_dark_modules();
        info!("Generated QR {}", qr.metadata());
        debug!(
            "Data capacity: {} bytes, Dark modules: {}, Balance: {}%",
            plan.data_bytes,
            dark_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }
}
