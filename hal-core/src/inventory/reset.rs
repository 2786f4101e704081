//! Reset lines exported as flat sysfs files; writing 1 holds the device in
//! reset, writing 0 releases it.

use std::sync::Arc;

use super::{Component, ResetLine};
use crate::context::HalContext;
use crate::desc::ResetDesc;
use crate::driver::SysfsDriver;
use crate::entry::{sysfs_resolver, BoolCodec, BoolEntry};

pub struct ResetSysfs {
    desc: ResetDesc,
    reset: BoolEntry,
}

impl ResetSysfs {
    pub fn new(ctx: &Arc<HalContext>, driver: &Arc<dyn SysfsDriver>, desc: ResetDesc) -> Self {
        Self {
            reset: BoolEntry::new(ctx, desc.name.clone(), sysfs_resolver(driver), BoolCodec),
            desc,
        }
    }

    pub fn get_addr(&self) -> u32 {
        self.desc.addr
    }

    pub fn get_bit(&self) -> u32 {
        self.desc.bit
    }
}

impl Component for ResetSysfs {
    fn name(&self) -> String {
        self.desc.name.clone()
    }
}

impl ResetLine for ResetSysfs {
    fn read(&self) -> Option<bool> {
        self.reset.read()
    }

    fn reset_in(&self) -> bool {
        self.reset.write(&true)
    }

    fn reset_out(&self) -> bool {
        self.reset.write(&false)
    }
}
