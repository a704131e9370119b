//! Mux command - audio passthrough onto a generated video

use crate::cli::args::MuxArgs;
use crate::error::VramslotResult;
use crate::media::Muxer;

/// Execute the mux command
pub async fn execute(args: MuxArgs) -> VramslotResult<()> {
    let output = Muxer::detect()
        .mux_audio_stream(&args.source, &args.video, &args.output)
        .await?;

    println!("{}", output.display());
    Ok(())
}
