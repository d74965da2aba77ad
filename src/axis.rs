use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[cfg(not(feature = "defmt-03"))]
use bitflags::bitflags;
#[cfg(feature = "defmt-03")]
use defmt::bitflags;

/// Physical sensor axis a remapped axis is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum Axis {
    X = 0b00,
    Y = 0b01,
    Z = 0b10,
}

/// Contents of `AXIS_MAP_CONFIG`, see section 3.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct AxisRemap {
    x: Axis,
    y: Axis,
    z: Axis,
}

impl Default for AxisRemap {
    fn default() -> Self {
        AxisRemap {
            x: Axis::X,
            y: Axis::Y,
            z: Axis::Z,
        }
    }
}

impl AxisRemap {
    pub fn builder() -> AxisRemapBuilder {
        AxisRemapBuilder {
            remap: AxisRemap::default(),
        }
    }

    pub fn x(&self) -> Axis {
        self.x
    }

    pub fn y(&self) -> Axis {
        self.y
    }

    pub fn z(&self) -> Axis {
        self.z
    }

    pub fn bits(&self) -> u8 {
        (self.x as u8) | ((self.y as u8) << 2) | ((self.z as u8) << 4)
    }

    /// Decodes `AXIS_MAP_CONFIG`; `None` for a reserved field value or a repeated axis.
    pub fn from_bits(bits: u8) -> Option<Self> {
        AxisRemapBuilder {
            remap: AxisRemap {
                x: Axis::from_u8(bits & 0b11)?,
                y: Axis::from_u8((bits >> 2) & 0b11)?,
                z: Axis::from_u8((bits >> 4) & 0b11)?,
            },
        }
        .build()
    }
}

#[derive(Debug)]
pub struct AxisRemapBuilder {
    remap: AxisRemap,
}

impl AxisRemapBuilder {
    pub fn swap_x_with(mut self, to: Axis) -> AxisRemapBuilder {
        let old_x = self.remap.x;
        self.assign(to, old_x);
        self.remap.x = to;

        self
    }

    pub fn swap_y_with(mut self, to: Axis) -> AxisRemapBuilder {
        let old_y = self.remap.y;
        self.assign(to, old_y);
        self.remap.y = to;

        self
    }

    pub fn swap_z_with(mut self, to: Axis) -> AxisRemapBuilder {
        let old_z = self.remap.z;
        self.assign(to, old_z);
        self.remap.z = to;

        self
    }

    fn assign(&mut self, slot: Axis, value: Axis) {
        match slot {
            Axis::X => self.remap.x = value,
            Axis::Y => self.remap.y = value,
            Axis::Z => self.remap.z = value,
        }
    }

    fn is_invalid(&self) -> bool {
        // Each physical axis may back only one output axis.
        self.remap.x == self.remap.y || self.remap.y == self.remap.z || self.remap.z == self.remap.x
    }

    pub fn build(self) -> Option<AxisRemap> {
        if self.is_invalid() {
            None
        } else {
            Some(self.remap)
        }
    }
}

bitflags! {
    /// Contents of `AXIS_MAP_SIGN`.
    #[cfg_attr(not(feature = "defmt-03"), derive(Debug, Clone, Copy, PartialEq, Eq))]
    pub struct AxisSign: u8 {
        const X_NEGATIVE = 0b100;
        const Y_NEGATIVE = 0b010;
        const Z_NEGATIVE = 0b001;
    }
}
