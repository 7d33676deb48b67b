use recordkit_codec::{encode_to_string_with, to_json, CodecConfig, KeyedLayout};
use tracing::debug;

use crate::cmd::{load_contact, ConvertArgs, ConvertTarget};
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::sample::ROOT_ELEMENT;

pub fn run(args: ConvertArgs) -> CliResult<i32> {
    let contact = load_contact(&args.file, args.options.as_deref(), args.strict)?;

    let text = match args.to {
        ConvertTarget::Json => {
            let layout = match args.indent {
                Some(_) => KeyedLayout::Indented,
                None => KeyedLayout::Compact,
            };
            to_json(&contact, layout).map_err(|err| codec_error("render json", err))?
        }
        ConvertTarget::Xml => {
            let config = CodecConfig {
                indent: args.indent,
                ..CodecConfig::default()
            };
            encode_to_string_with(&contact, ROOT_ELEMENT, config)
                .map_err(|err| codec_error("encode xml", err))?
        }
    };

    debug!(target_format = ?args.to, bytes = text.len(), "converted contact");
    println!("{text}");
    Ok(SUCCESS)
}
