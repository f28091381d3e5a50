//! `REGION.SDL`/`REGIONS.SDL` (OEM mode): fixed 4096-byte
//! region-name tables with per-language translations.

pub const FILE_LEN: usize = 4096;
const NAME_SLOT_LEN: usize = 16;
const SLOTS_PER_REGION: usize = 10;

/// One region's display name in its native language plus translations
/// keyed by 3-letter language code (a cut-down stand-in for the source's
/// built-in country dictionary — see DESIGN.md).
#[derive(Debug, Clone, Default)]
pub struct RegionInfo {
    pub native_name: String,
    pub translations: std::collections::HashMap<String, String>,
}

fn encode_name_slot(name: &str) -> [u8; NAME_SLOT_LEN] {
    let mut slot = [0u8; NAME_SLOT_LEN];
    let bytes = name.as_bytes();
    let n = bytes.len().min(NAME_SLOT_LEN - 1);
    slot[..n].copy_from_slice(&bytes[..n]);
    slot
}

/// Resolve a region's name for `lang`, falling back to `"UKE"` then the
/// native name.
fn resolve_name<'a>(info: &'a RegionInfo, lang: &str) -> &'a str {
    info.translations
        .get(lang)
        .or_else(|| info.translations.get("UKE"))
        .map(|s| s.as_str())
        .unwrap_or(&info.native_name)
}

fn encode_region_table(regions: &[RegionInfo], supported_langs: &[String]) -> Vec<u8> {
    let mut out = Vec::with_capacity(regions.len() * SLOTS_PER_REGION * NAME_SLOT_LEN);
    for region in regions {
        out.extend_from_slice(&encode_name_slot(&region.native_name));
        for i in 1..SLOTS_PER_REGION {
            if let Some(lang) = supported_langs.get(i - 1) {
                out.extend_from_slice(&encode_name_slot(resolve_name(region, lang)));
            } else {
                out.extend_from_slice(&[0u8; NAME_SLOT_LEN]);
            }
        }
    }
    out
}

/// `REGION.SDL`: magic, continent label, language field, then the region
/// name table, all padded/truncated to exactly 4096 bytes.
pub fn encode_region_sdl(continent: &str, supported_langs: &[String], regions: &[RegionInfo]) -> Vec<u8> {
    let mut out = Vec::with_capacity(FILE_LEN);
    out.extend_from_slice(b"SDAL");
    out.extend_from_slice(&[0u8; 12]);

    let mut label = [0u8; 14];
    let lbytes = continent.as_bytes();
    let n = lbytes.len().min(14);
    label[..n].copy_from_slice(&lbytes[..n]);
    for b in label.iter_mut().skip(n) {
        *b = b' ';
    }
    out.extend_from_slice(&label);
    out.push(0);

    let mut lang_field = [b' '; 30];
    let joined: String = supported_langs.join("");
    let jbytes = joined.as_bytes();
    let n = jbytes.len().min(30);
    lang_field[..n].copy_from_slice(&jbytes[..n]);
    out.extend_from_slice(&lang_field);
    out.push(0);

    out.extend_from_slice(&encode_region_table(regions, supported_langs));
    out.resize(FILE_LEN, 0);
    out.truncate(FILE_LEN);
    out
}

/// `REGIONS.SDL`: identical to `REGION.SDL` minus the label/language
/// header fields.
pub fn encode_regions_sdl(regions: &[RegionInfo], supported_langs: &[String]) -> Vec<u8> {
    let mut out = Vec::with_capacity(FILE_LEN);
    out.extend_from_slice(&encode_region_table(regions, supported_langs));
    out.resize(FILE_LEN, 0);
    out.truncate(FILE_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(native: &str) -> RegionInfo {
        RegionInfo { native_name: native.to_string(), translations: Default::default() }
    }

    #[test]
    fn region_sdl_is_exactly_4096_bytes() {
        let regions = vec![region("Cyprus")];
        let file = encode_region_sdl("Europe", &["ENG".to_string()], &regions);
        assert_eq!(file.len(), FILE_LEN);
    }

    #[test]
    fn regions_sdl_is_exactly_4096_bytes_and_omits_header() {
        let regions = vec![region("Cyprus")];
        let file = encode_regions_sdl(&regions, &["ENG".to_string()]);
        assert_eq!(file.len(), FILE_LEN);
        assert_eq!(&file[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn falls_back_to_uke_then_native() {
        let mut r = region("Zypern");
        r.translations.insert("UKE".to_string(), "Cyprus".to_string());
        assert_eq!(resolve_name(&r, "FRA"), "Cyprus");
        assert_eq!(resolve_name(&r, "UKE"), "Cyprus");

        let r2 = region("Zypern");
        assert_eq!(resolve_name(&r2, "FRA"), "Zypern");
    }

    #[test]
    fn magic_bytes_present() {
        let file = encode_region_sdl("Europe", &[], &[]);
        assert_eq!(&file[0..4], b"SDAL");
    }
}
