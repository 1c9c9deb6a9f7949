use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

/// Standard alphabet, padding optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// URL-safe alphabet, padding optional on decode.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 subscription body into UTF-8 text.
///
/// Whitespace (line wrapping, trailing newline) is ignored and padding is
/// optional. Both the standard and the URL-safe alphabet are accepted.
///
/// # Returns
/// The decoded text, or a message describing why the body is not valid
/// Base64 or not valid UTF-8.
pub fn base64_decode_strict(input: &str) -> Result<String, String> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = match LENIENT.decode(&compact) {
        Ok(bytes) => bytes,
        Err(std_err) => match LENIENT_URL_SAFE.decode(&compact) {
            Ok(bytes) => bytes,
            Err(_) => return Err(std_err.to_string()),
        },
    };

    String::from_utf8(bytes).map_err(|e| e.to_string())
}
