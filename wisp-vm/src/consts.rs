//! VM parameters.

/// Number of virtual registers.
pub const VM_REGISTER_COUNT: usize = 16;

/// Size of the VM memory region, in bytes.
pub const MEM_SIZE: usize = 0x10_0000;

/// Mask folding computed addresses into the memory region.
pub const ADDR_MASK: u32 = (MEM_SIZE - 1) as u32;

/// First byte of the scoped-variable (locals) zone.
pub const LOCAL_LO: u32 = 0x00_0000;
/// Last byte of the scoped-variable zone.
pub const LOCAL_HI: u32 = 0x00_FFFF;

/// First byte of the shadow-stack zone. Reserved for layout compatibility;
/// the VM never writes it.
pub const SHADOW_STACK_LO: u32 = 0x01_0000;
/// Last byte of the shadow-stack zone.
pub const SHADOW_STACK_HI: u32 = 0x01_FFFF;

/// First byte of the reserved zone.
pub const RESERVED_LO: u32 = 0x02_0000;
/// Last byte of the reserved zone.
pub const RESERVED_HI: u32 = 0x02_FFFF;

/// First byte of the scratch zone.
pub const SCRATCH_LO: u32 = 0x03_0000;
/// Last byte of the scratch zone.
pub const SCRATCH_HI: u32 = 0x0F_FFFF;

/// Call stack capacity, in frames.
pub const CALL_STACK_CAPACITY: usize = 128;

/// Stack size handed to forked guest threads.
pub const GUEST_STACK_SIZE: usize = 0x2_0000;

/// Process exit code diagnosing call-stack exhaustion.
pub const STACK_EXHAUSTED_EXIT: u32 = 0xEF32;

static_assertions::const_assert!(MEM_SIZE.is_power_of_two());
static_assertions::const_assert_eq!(SCRATCH_HI, (MEM_SIZE - 1) as u32);
static_assertions::const_assert_eq!(LOCAL_HI + 1, SHADOW_STACK_LO);
static_assertions::const_assert_eq!(SHADOW_STACK_HI + 1, RESERVED_LO);
static_assertions::const_assert_eq!(RESERVED_HI + 1, SCRATCH_LO);
static_assertions::const_assert!(CALL_STACK_CAPACITY <= u8::MAX as usize);
