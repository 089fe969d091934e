//! Pack and link steps.

use crate::dialect::CART_SIZE_VAR;
use crate::labels::{Labels, Message};
use crate::planner::link_artifact;
use crate::script::Script;
use crate::toolchain::{self, Flags, ROM_NAME, ROM_OUTPUT};
use std::path::PathBuf;

/// First ROM bank the packer may place code into (`gbspack -b`).
pub const FIRST_PACK_BANK: u32 = 4;

/// Emit the packer invocation (binding `CART_SIZE`) followed by the final
/// link of every object.
#[must_use]
pub fn emit_pack_and_link<'d>(
    script: Script<'d>,
    objects: &[PathBuf],
    flags: &Flags,
    labels: &Labels,
) -> Script<'d> {
    let dialect = script.dialect();
    let platform = dialect.platform();

    let objs: Vec<String> = objects.iter().map(|o| script.arg(o)).collect();
    let rels: Vec<String> = objects
        .iter()
        .map(|o| script.arg(&link_artifact(o)))
        .collect();

    let pack = format!(
        "{} -f 255 -b {FIRST_PACK_BANK} -e rel -c {}",
        toolchain::packer(platform),
        objs.join(" ")
    );
    let script = script.captured(labels.get(Message::Packing), CART_SIZE_VAR, &pack);

    let (offset_lines, start_save) =
        dialect.save_offset(labels.get(Message::CalculatingStartSave), CART_SIZE_VAR);

    let link = format!(
        "{} {} -Wl-yo{} -Wl-g__start_save={start_save} -o {ROM_OUTPUT} {}",
        toolchain::compiler(platform),
        flags.lflags,
        dialect.var(CART_SIZE_VAR),
        rels.join(" ")
    );
    let label = format!("{}: {ROM_NAME}", labels.get(Message::Linking));

    script.raw(offset_lines).command(&label, &link)
}
